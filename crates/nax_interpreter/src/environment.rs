use std::{cell::RefCell, collections::HashMap, rc::Rc};

use nax_parser::token::Token;

use crate::error::RuntimeError;
use crate::object::Object;

/// A chained mapping from name to value. Lookups walk outward through the
/// enclosing scopes; the chain is a strict tree with block-scoped lifetimes,
/// so no cycles can form.
#[derive(Debug)]
pub struct Environment {
    store: HashMap<String, Rc<Object>>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            store: HashMap::new(),
            enclosing: None,
        }
    }

    /// Create a new environment nested inside the given enclosing scope
    pub fn new_enclosed(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            store: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind a name in this scope, silently replacing any binding already
    /// here. Bindings in enclosing scopes are shadowed, never touched.
    pub fn define(&mut self, name: String, value: Rc<Object>) {
        self.store.insert(name, value);
    }

    pub fn get(&self, name: &Token) -> Result<Rc<Object>, RuntimeError> {
        match self.store.get(&name.lexeme) {
            Some(value) => Ok(Rc::clone(value)),
            // Not here: look outward through the enclosing scopes
            None => match self.enclosing {
                Some(ref enclosing) => enclosing.borrow().get(name),
                None => Err(RuntimeError::UndefinedVariable(name.clone())),
            },
        }
    }

    /// Overwrite the nearest existing binding for the name. Assignment
    /// never creates a binding.
    pub fn assign(&mut self, name: &Token, value: Rc<Object>) -> Result<(), RuntimeError> {
        if self.store.contains_key(&name.lexeme) {
            self.store.insert(name.lexeme.clone(), value);
            Ok(())
        } else {
            match self.enclosing {
                Some(ref enclosing) => enclosing.borrow_mut().assign(name, value),
                None => Err(RuntimeError::UndefinedVariable(name.clone())),
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::environment::Environment;
    use crate::error::RuntimeError;
    use crate::object::Object;
    use nax_parser::token::{Token, TokenKind};

    fn name(lexeme: &str) -> Token {
        Token::new(TokenKind::Identifier, lexeme.to_owned(), None, 1)
    }

    #[test]
    fn define_and_get() {
        let mut env = Environment::new();
        env.define("a".to_owned(), Rc::new(Object::Number(1.0)));

        assert_eq!(*env.get(&name("a")).unwrap(), Object::Number(1.0));
    }

    #[test]
    fn redefining_replaces_in_same_scope() {
        let mut env = Environment::new();
        env.define("a".to_owned(), Rc::new(Object::Number(1.0)));
        env.define("a".to_owned(), Rc::new(Object::Number(2.0)));

        assert_eq!(*env.get(&name("a")).unwrap(), Object::Number(2.0));
    }

    #[test]
    fn get_walks_the_chain() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer
            .borrow_mut()
            .define("a".to_owned(), Rc::new(Object::Number(1.0)));

        let inner = Environment::new_enclosed(Rc::clone(&outer));
        assert_eq!(*inner.get(&name("a")).unwrap(), Object::Number(1.0));
    }

    #[test]
    fn get_unbound_fails() {
        let env = Environment::new();
        assert_eq!(
            env.get(&name("missing")),
            Err(RuntimeError::UndefinedVariable(name("missing")))
        );
    }

    #[test]
    fn shadowing_does_not_touch_the_outer_binding() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer
            .borrow_mut()
            .define("a".to_owned(), Rc::new(Object::Number(1.0)));

        let mut inner = Environment::new_enclosed(Rc::clone(&outer));
        inner.define("a".to_owned(), Rc::new(Object::Number(2.0)));

        assert_eq!(*inner.get(&name("a")).unwrap(), Object::Number(2.0));
        assert_eq!(*outer.borrow().get(&name("a")).unwrap(), Object::Number(1.0));
    }

    #[test]
    fn assign_overwrites_the_nearest_binding() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer
            .borrow_mut()
            .define("a".to_owned(), Rc::new(Object::Number(1.0)));

        let mut inner = Environment::new_enclosed(Rc::clone(&outer));
        inner
            .assign(&name("a"), Rc::new(Object::Number(2.0)))
            .unwrap();

        // No binding was created in the inner scope; the outer one changed
        assert_eq!(*outer.borrow().get(&name("a")).unwrap(), Object::Number(2.0));
    }

    #[test]
    fn assign_unbound_fails() {
        let mut env = Environment::new();
        assert_eq!(
            env.assign(&name("x"), Rc::new(Object::Nil)),
            Err(RuntimeError::UndefinedVariable(name("x")))
        );
        // Failure must not have created the binding
        assert!(env.get(&name("x")).is_err());
    }
}

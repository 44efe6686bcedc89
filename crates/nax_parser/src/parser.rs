use crate::ast::{
    AssignExpr, BinaryExpr, Expr, IfStmt, LiteralValue, LogicalExpr, Program, Stmt, UnaryExpr,
    VarStmt, WhileStmt,
};
use crate::report::ErrorSink;
use crate::token::{Literal, Token, TokenKind};

/// The panic-mode recovery signal. It is reported to the sink and consumed
/// at the nearest declaration boundary; it never escapes `parse_program`.
#[derive(Debug)]
struct ParseError {
    line: usize,
    message: String,
}

type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'t, 's> {
    tokens: &'t [Token],
    current: usize,
    sink: &'s mut dyn ErrorSink,
}

impl<'t, 's> Parser<'t, 's> {
    pub fn new(tokens: &'t [Token], sink: &'s mut dyn ErrorSink) -> Parser<'t, 's> {
        Parser {
            tokens,
            current: 0,
            sink,
        }
    }

    /// Parse every top-level declaration. A malformed declaration is
    /// reported and skipped, so one pass can surface several independent
    /// syntax errors; the caller decides whether the result is usable.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(statement) => program.statements.push(statement),
                Err(error) => {
                    self.sink.error(error.line, &error.message);
                    self.synchronize();
                }
            }
        }

        program
    }

    // declaration → "var" IDENT ("=" expression)? ";" | statement
    fn declaration(&mut self) -> ParseResult<Stmt> {
        if self.advance_if(TokenKind::Var) {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;

        let initializer = if self.advance_if(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration",
        )?;
        Ok(Stmt::Var(VarStmt { name, initializer }))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.advance_if(TokenKind::For) {
            self.for_statement()
        } else if self.advance_if(TokenKind::If) {
            self.if_statement()
        } else if self.advance_if(TokenKind::Print) {
            self.print_statement()
        } else if self.advance_if(TokenKind::While) {
            self.while_statement()
        } else if self.advance_if(TokenKind::LeftBrace) {
            Ok(Stmt::Block(self.block()?))
        } else {
            self.expression_statement()
        }
    }

    /// `for` is pure sugar: the clauses are rewritten into a while loop
    /// before the interpreter ever sees them.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.advance_if(TokenKind::Semicolon) {
            None
        } else if self.advance_if(TokenKind::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition = condition.unwrap_or(Expr::Literal(LiteralValue::Boolean(true)));
        body = Stmt::While(Box::new(WhileStmt { condition, body }));

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = self.statement()?;
        // An else binds to the nearest preceding if
        let else_branch = if self.advance_if(TokenKind::Else) {
            Some(self.statement()?)
        } else {
            None
        };

        Ok(Stmt::If(Box::new(IfStmt {
            condition,
            then_branch,
            else_branch,
        })))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = self.statement()?;

        Ok(Stmt::While(Box::new(WhileStmt { condition, body })))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after block")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression")?;
        Ok(Stmt::Expression(expression))
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    // assignment → logic_or ("=" assignment)?
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.logic_or()?;

        if self.advance_if(TokenKind::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign(Box::new(AssignExpr { name, value }))),
                // Reported without a recovery signal: the parser is not in a
                // confused state here, so synchronizing would throw away
                // well-formed input.
                other => {
                    self.sink.error(equals.line, "Invalid assignment target");
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn logic_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.logic_and()?;

        while let Some(operator) = self.advance_if_any(&[TokenKind::Or]) {
            let right = self.logic_and()?;
            expr = Expr::Logical(Box::new(LogicalExpr {
                left: expr,
                operator,
                right,
            }));
        }

        Ok(expr)
    }

    fn logic_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while let Some(operator) = self.advance_if_any(&[TokenKind::And]) {
            let right = self.equality()?;
            expr = Expr::Logical(Box::new(LogicalExpr {
                left: expr,
                operator,
                right,
            }));
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while let Some(operator) =
            self.advance_if_any(&[TokenKind::BangEqual, TokenKind::EqualEqual])
        {
            let right = self.comparison()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right,
            }));
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while let Some(operator) = self.advance_if_any(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let right = self.term()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right,
            }));
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while let Some(operator) = self.advance_if_any(&[TokenKind::Minus, TokenKind::Plus]) {
            let right = self.factor()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right,
            }));
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while let Some(operator) = self.advance_if_any(&[TokenKind::Slash, TokenKind::Star]) {
            let right = self.unary()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right,
            }));
        }

        Ok(expr)
    }

    // unary → ("!" | "-") unary | primary
    fn unary(&mut self) -> ParseResult<Expr> {
        if let Some(operator) = self.advance_if_any(&[TokenKind::Bang, TokenKind::Minus]) {
            let right = self.unary()?;
            return Ok(Expr::Unary(Box::new(UnaryExpr { operator, right })));
        }

        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(LiteralValue::Boolean(false)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(LiteralValue::Boolean(true)))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::Literal(LiteralValue::Nil))
            }
            TokenKind::Number | TokenKind::String => {
                let token = self.advance().clone();
                match token.literal {
                    Some(Literal::Number(value)) => Ok(Expr::Literal(LiteralValue::Number(value))),
                    Some(Literal::String(value)) => Ok(Expr::Literal(LiteralValue::String(value))),
                    // A literal token always carries its value; a missing one
                    // means the token sequence was not produced by the scanner
                    None => Err(self.error_at(&token, "Expect expression.")),
                }
            }
            TokenKind::Identifier => {
                let name = self.advance().clone();
                Ok(Expr::Variable(name))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(Expr::Grouping(Box::new(expr)))
            }
            _ => Err(self.error_at(self.peek(), "Expect expression.")),
        }
    }

    /// Discard tokens until a statement boundary: just past a semicolon, or
    /// right before a token that can begin a new statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {}
            }

            self.advance();
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance_if(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance_if_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.contains(&self.peek().kind) {
            Some(self.advance().clone())
        } else {
            None
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error_at(self.peek(), message))
        }
    }

    fn error_at(&self, token: &Token, message: &str) -> ParseError {
        ParseError {
            line: token.line,
            message: message.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::Program;
    use crate::parser::Parser;
    use crate::report::CollectSink;
    use crate::scanner::Scanner;

    fn parse(input: &str) -> (Program, CollectSink) {
        let mut sink = CollectSink::new();
        let tokens = Scanner::new(input).scan_tokens(&mut sink);
        let program = Parser::new(&tokens, &mut sink).parse_program();
        (program, sink)
    }

    fn parse_clean(input: &str) -> Program {
        let (program, sink) = parse(input);
        assert!(
            sink.errors.is_empty(),
            "unexpected errors for '{}': {:?}",
            input,
            sink.errors
        );
        program
    }

    #[test]
    fn expression_precedence() {
        let tests = vec![
            ("1 + 2 * 3;", "(1 + (2 * 3));"),
            ("(1 + 2) * 3;", "((1 + 2) * 3);"),
            ("1 - 2 - 3;", "((1 - 2) - 3);"),
            ("6 / 2 / 3;", "((6 / 2) / 3);"),
            ("-1 - -2;", "((-1) - (-2));"),
            ("!!true;", "(!(!true));"),
            ("1 < 2 == true;", "((1 < 2) == true);"),
            ("1 + 2 < 3 + 4;", "((1 + 2) < (3 + 4));"),
            ("a == b != c;", "((a == b) != c);"),
            ("a or b and c;", "(a or (b and c));"),
            ("a and b == c;", "(a and (b == c));"),
            ("a = b = 1;", "(a = (b = 1));"),
            ("a = b or c;", "(a = (b or c));"),
            ("nil;", "nil;"),
            ("\"foo\" + \"bar\";", "(\"foo\" + \"bar\");"),
        ];

        for (input, expected) in tests {
            let program = parse_clean(input);
            assert_eq!(program.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn statements() {
        let tests = vec![
            ("var x;", "var x;"),
            ("var x = 1 + 2;", "var x = (1 + 2);"),
            ("print 1;", "print 1;"),
            ("{ var a = 1; print a; }", "{ var a = 1; print a; }"),
            ("while (a < 3) print a;", "while ((a < 3)) print a;"),
            (
                "if (a) print 1; else print 2;",
                "if (a) print 1; else print 2;",
            ),
            ("if (a) print 1;", "if (a) print 1;"),
        ];

        for (input, expected) in tests {
            let program = parse_clean(input);
            assert_eq!(program.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn else_binds_to_nearest_if() {
        let program = parse_clean("if (a) if (b) print 1; else print 2;");
        assert_eq!(
            program.to_string(),
            "if (a) if (b) print 1; else print 2;"
        );
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn for_desugars_to_while() {
        let program = parse_clean("for (var i = 0; i < 3; i = i + 1) print i;");
        assert_eq!(
            program.to_string(),
            "{ var i = 0; while ((i < 3)) { print i; (i = (i + 1)); } }"
        );
    }

    #[test]
    fn for_without_clauses() {
        let program = parse_clean("for (;;) print 1;");
        assert_eq!(program.to_string(), "while (true) print 1;");
    }

    #[test]
    fn for_with_expression_initializer() {
        let program = parse_clean("for (i = 0; i < 3;) print i;");
        assert_eq!(
            program.to_string(),
            "{ (i = 0); while ((i < 3)) print i; }"
        );
    }

    #[test]
    fn invalid_assignment_target_keeps_statement() {
        let (program, sink) = parse("a + 1 = 2;");

        // The error is reported, but the parser does not panic: the
        // statement around the bad target still parses.
        assert_eq!(sink.errors, vec![(1, "Invalid assignment target".to_owned())]);
        assert_eq!(program.to_string(), "(a + 1);");
    }

    #[test]
    fn recovery_surfaces_multiple_errors() {
        let input = "var = 1;\nprint 2;\nvar x 5;";
        let (program, sink) = parse(input);

        assert_eq!(
            sink.errors,
            vec![
                (1, "Expect variable name.".to_owned()),
                (3, "Expect ';' after variable declaration".to_owned()),
            ]
        );
        // The well-formed statement in between survives
        assert_eq!(program.to_string(), "print 2;");
    }

    #[test]
    fn recovery_at_statement_keywords() {
        let (program, sink) = parse("1 + ;\nwhile (a < 3) print a;");

        assert_eq!(sink.errors, vec![(1, "Expect expression.".to_owned())]);
        assert_eq!(program.to_string(), "while ((a < 3)) print a;");
    }

    #[test]
    fn missing_parenthesis_reports() {
        let tests = vec![
            ("if a) print 1;", "Expect '(' after 'if'."),
            ("if (a print 1;", "Expect ')' after if condition."),
            ("while (a print 1;", "Expect ')' after condition."),
            ("(1 + 2;", "Expect ')' after expression."),
            ("{ print 1;", "Expect '}' after block"),
            ("print 1", "Expect ';' after value."),
        ];

        for (input, expected) in tests {
            let (_, sink) = parse(input);
            assert_eq!(sink.errors.len(), 1, "input: {}", input);
            assert_eq!(sink.errors[0].1, expected, "input: {}", input);
        }
    }

    #[test]
    fn unsupported_keywords_do_not_parse() {
        // Recognized by the scanner, but outside this statement subset
        let (_, sink) = parse("class Foo {}");
        assert!(!sink.errors.is_empty());
    }
}

//! Recursive descent parser for query documents.

use graphgate_proto::{
    Definition, Document, Field, FragmentDefinition, FragmentSpread, InlineFragment, InputValue,
    OperationDefinition, OperationKind, Selection, SelectionSet, TypeRef, VariableDefinition,
};

use crate::error::ParseError;
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::span::{Span, Spanned};

/// Parser for query documents.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    source: &'source str,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            lexer: Lexer::new(source),
            source,
        }
    }

    /// Parse a complete document.
    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let mut definitions = Vec::new();

        while self.lexer.peek().is_some() {
            definitions.push(self.parse_definition()?);
        }
        self.check_invalid()?;

        if definitions.is_empty() {
            return Err(ParseError::new("document contains no definitions", self.eof_span())
                .with_hint("a query looks like `{ persons { id } }`"));
        }

        Ok(Document::new(definitions))
    }

    fn parse_definition(&mut self) -> Result<Definition, ParseError> {
        if self.peek_is(&Token::LBrace) {
            let selection_set = self.parse_selection_set()?;
            return Ok(Definition::Operation(OperationDefinition::query(
                selection_set,
            )));
        }

        let keyword = self.expect_name()?;
        match keyword.value.as_str() {
            "query" => self.parse_operation(OperationKind::Query),
            "mutation" => self.parse_operation(OperationKind::Mutation),
            "subscription" => self.parse_operation(OperationKind::Subscription),
            "fragment" => self.parse_fragment_definition(),
            other => Err(ParseError::new(
                format!("expected definition, found `{}`", other),
                keyword.span,
            )
            .with_hint("definitions start with `{`, `query`, `mutation`, `subscription` or `fragment`")),
        }
    }

    fn parse_operation(&mut self, kind: OperationKind) -> Result<Definition, ParseError> {
        let name = if self.peek_is(&Token::Name(String::new())) {
            Some(self.expect_name()?.value)
        } else {
            None
        };

        let variables = if self.peek_is(&Token::LParen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };

        self.skip_directives()?;
        let selection_set = self.parse_selection_set()?;

        Ok(Definition::Operation(OperationDefinition {
            kind,
            name,
            variables,
            selection_set,
        }))
    }

    fn parse_variable_definitions(&mut self) -> Result<Vec<VariableDefinition>, ParseError> {
        self.expect_token(Token::LParen)?;
        let mut variables = Vec::new();

        while !self.peek_is(&Token::RParen) {
            self.expect_token(Token::Dollar)?;
            let name = self.expect_name()?.value;
            self.expect_token(Token::Colon)?;
            let var_type = self.parse_type()?;
            let default_value = if self.peek_is(&Token::Equals) {
                self.next_token()?;
                Some(self.parse_value()?)
            } else {
                None
            };
            self.skip_directives()?;
            variables.push(VariableDefinition {
                name,
                var_type,
                default_value,
            });
        }

        self.expect_token(Token::RParen)?;
        Ok(variables)
    }

    fn parse_type(&mut self) -> Result<TypeRef, ParseError> {
        let inner = if self.peek_is(&Token::LBracket) {
            self.next_token()?;
            let item = self.parse_type()?;
            self.expect_token(Token::RBracket)?;
            TypeRef::List(Box::new(item))
        } else {
            TypeRef::Named(self.expect_name()?.value)
        };

        if self.peek_is(&Token::Bang) {
            self.next_token()?;
            return Ok(TypeRef::NonNull(Box::new(inner)));
        }
        Ok(inner)
    }

    fn parse_fragment_definition(&mut self) -> Result<Definition, ParseError> {
        let name = self.expect_name()?;
        if name.value == "on" {
            return Err(ParseError::new("fragment name cannot be `on`", name.span));
        }
        self.expect_keyword("on")?;
        let type_condition = self.expect_name()?.value;
        self.skip_directives()?;
        let selection_set = self.parse_selection_set()?;

        Ok(Definition::Fragment(FragmentDefinition {
            name: name.value,
            type_condition,
            selection_set,
        }))
    }

    fn parse_selection_set(&mut self) -> Result<SelectionSet, ParseError> {
        let open = self.expect_token(Token::LBrace)?;
        let mut items = Vec::new();

        while !self.peek_is(&Token::RBrace) {
            if self.lexer.peek().is_none() {
                self.check_invalid()?;
                return Err(ParseError::new("unclosed selection set", open.span)
                    .with_hint("add a matching `}`"));
            }
            items.push(self.parse_selection()?);
        }
        self.expect_token(Token::RBrace)?;

        if items.is_empty() {
            return Err(ParseError::new("selection set cannot be empty", open.span));
        }
        Ok(SelectionSet::new(items))
    }

    fn parse_selection(&mut self) -> Result<Selection, ParseError> {
        if self.peek_is(&Token::Spread) {
            self.next_token()?;
            return self.parse_fragment();
        }
        Ok(Selection::Field(self.parse_field()?))
    }

    /// Parse what follows `...`: a fragment spread or an inline fragment.
    fn parse_fragment(&mut self) -> Result<Selection, ParseError> {
        let name = match self.lexer.peek() {
            Some(SpannedToken {
                token: Token::Name(n),
                ..
            }) => Some(n.clone()),
            _ => None,
        };

        match name {
            Some(n) if n != "on" => {
                self.next_token()?;
                self.skip_directives()?;
                Ok(Selection::FragmentSpread(FragmentSpread { name: n }))
            }
            Some(_) => {
                self.next_token()?;
                let type_condition = Some(self.expect_name()?.value);
                self.skip_directives()?;
                let selection_set = self.parse_selection_set()?;
                Ok(Selection::InlineFragment(InlineFragment {
                    type_condition,
                    selection_set,
                }))
            }
            None => {
                self.skip_directives()?;
                let selection_set = self.parse_selection_set()?;
                Ok(Selection::InlineFragment(InlineFragment {
                    type_condition: None,
                    selection_set,
                }))
            }
        }
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let first = self.expect_name()?;
        let (alias, name) = if self.peek_is(&Token::Colon) {
            self.next_token()?;
            (Some(first.value), self.expect_name()?.value)
        } else {
            (None, first.value)
        };

        let arguments = if self.peek_is(&Token::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        self.skip_directives()?;

        let selection_set = if self.peek_is(&Token::LBrace) {
            Some(self.parse_selection_set()?)
        } else {
            None
        };

        Ok(Field {
            alias,
            name,
            arguments,
            selection_set,
        })
    }

    fn parse_arguments(&mut self) -> Result<Vec<(String, InputValue)>, ParseError> {
        let open = self.expect_token(Token::LParen)?;
        let mut arguments = Vec::new();

        while !self.peek_is(&Token::RParen) {
            let name = self.expect_name()?.value;
            self.expect_colon("arguments are written as `name: value`")?;
            arguments.push((name, self.parse_value()?));
        }
        let close = self.expect_token(Token::RParen)?;

        if arguments.is_empty() {
            return Err(ParseError::new(
                "argument list cannot be empty",
                open.span.merge(close.span),
            ));
        }
        Ok(arguments)
    }

    /// Directives are accepted and discarded.
    fn skip_directives(&mut self) -> Result<(), ParseError> {
        while self.peek_is(&Token::At) {
            self.next_token()?;
            self.expect_name()?;
            if self.peek_is(&Token::LParen) {
                self.parse_arguments()?;
            }
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<InputValue, ParseError> {
        let tok = self.next_token()?;
        let value = match tok.token {
            Token::Dollar => InputValue::Variable(self.expect_name()?.value),
            Token::Int(i) => InputValue::Int(i),
            Token::Float(f) => InputValue::Float(f),
            Token::String(s) => InputValue::String(s),
            Token::Name(name) => match name.as_str() {
                "true" => InputValue::Bool(true),
                "false" => InputValue::Bool(false),
                "null" => InputValue::Null,
                _ => InputValue::Enum(name),
            },
            Token::LBracket => {
                let mut items = Vec::new();
                while !self.peek_is(&Token::RBracket) {
                    items.push(self.parse_value()?);
                }
                self.expect_token(Token::RBracket)?;
                InputValue::List(items)
            }
            Token::LBrace => {
                let mut fields = Vec::new();
                while !self.peek_is(&Token::RBrace) {
                    let name = self.expect_name()?.value;
                    self.expect_colon("object fields are written as `name: value`")?;
                    fields.push((name, self.parse_value()?));
                }
                self.expect_token(Token::RBrace)?;
                InputValue::Object(fields)
            }
            other => {
                return Err(ParseError::new(
                    format!("expected value, found {:?}", other),
                    tok.span,
                ))
            }
        };
        Ok(value)
    }

    fn peek_is(&mut self, expected: &Token) -> bool {
        self.lexer
            .peek()
            .is_some_and(|t| std::mem::discriminant(&t.token) == std::mem::discriminant(expected))
    }

    /// Expect and consume a name.
    fn expect_name(&mut self) -> Result<Spanned<String>, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::Name(name) => Ok(Spanned::new(name, tok.span)),
            other => Err(ParseError::new(
                format!("expected name, found {:?}", other),
                tok.span,
            )),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        let name = self.expect_name()?;
        if name.value == keyword {
            Ok(())
        } else {
            Err(ParseError::new(
                format!("expected `{}`, found `{}`", keyword, name.value),
                name.span,
            ))
        }
    }

    fn expect_colon(&mut self, hint: &str) -> Result<(), ParseError> {
        self.expect_token(Token::Colon)
            .map(|_| ())
            .map_err(|e| e.with_hint(hint))
    }

    /// Expect and consume a specific token.
    fn expect_token(&mut self, expected: Token) -> Result<SpannedToken, ParseError> {
        let tok = self.next_token()?;
        if std::mem::discriminant(&tok.token) == std::mem::discriminant(&expected) {
            Ok(tok)
        } else {
            Err(ParseError::new(
                format!("expected {:?}, found {:?}", expected, tok.token),
                tok.span,
            ))
        }
    }

    /// Get the next token or error if EOF.
    fn next_token(&mut self) -> Result<SpannedToken, ParseError> {
        match self.lexer.next_token() {
            Some(tok) => Ok(tok),
            None => {
                self.check_invalid()?;
                Err(ParseError::new("unexpected end of input", self.eof_span()))
            }
        }
    }

    fn check_invalid(&self) -> Result<(), ParseError> {
        match self.lexer.invalid() {
            Some(span) => {
                let text = self.source.get(span.start..span.end).unwrap_or_default();
                Err(ParseError::new(format!("unexpected character `{}`", text), span))
            }
            None => Ok(()),
        }
    }

    fn eof_span(&self) -> Span {
        Span::at(self.source.len())
    }
}

/// Parse a source string into a document.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    let mut parser = Parser::new(source);
    parser.parse_document()
}

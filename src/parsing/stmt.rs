//! Statement grammar.
//!
//! Statement lists are parsed as streams: before each statement the
//! stream first captures whole comment lines and blank lines as marker
//! statements, so a consumer can reproduce the vertical shape of the
//! method body. The dangling else binds to the nearest `if` simply
//! because the else-clause is attempted greedily on the innermost
//! statement first.

use crate::ast::{
    AssertStatement, Block, BreakStatement, CatchClause, ConstructorInvocation, ContinueStatement,
    DoStatement, EmptyStatement, EndOfLineComment, EnhancedForStatement, Expr,
    ExpressionStatement, ExtendedModifier, ForStatement, IfStatement, JavaDocComment,
    LabeledStatement, LineEmpty, ReturnStatement, SingleVariableDeclaration, Stmt,
    SuperConstructorInvocation, SwitchCase, SwitchStatement, SynchronizedStatement,
    ThrowStatement, TraditionalComment, TryStatement, Ty, TypeDeclarationStatement,
    VariableDeclarationExpression, VariableDeclarationFragment, VariableDeclarationStatement,
    WhileStatement,
};
use crate::builder::build_list;
use crate::parsing::lexical::SourceMarker;
use crate::parsing::{alt, PResult, Parser};

fn marker_statement(marker: SourceMarker) -> Stmt {
    match marker {
        SourceMarker::EndOfLine { comment, loc } => {
            Stmt::EndOfLineComment(EndOfLineComment { comment, loc })
        }
        SourceMarker::Traditional { comment, loc } => {
            Stmt::TraditionalComment(TraditionalComment { comment, loc })
        }
        SourceMarker::JavaDoc { comment, loc } => {
            Stmt::JavaDocComment(JavaDocComment { comment, loc })
        }
        SourceMarker::Blank { loc } => Stmt::LineEmpty(LineEmpty { loc }),
    }
}

impl Parser {
    pub(crate) fn block(&mut self) -> PResult<Block> {
        let start = self.pos;
        self.sym_line("{")?;
        let statements = self.statement_stream()?;
        self.indent();
        self.sym_line("}")?;
        Ok(Block {
            statements,
            loc: self.loc_from(start),
        })
    }

    fn statement_stream(&mut self) -> PResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            match self.attempt(Self::source_marker) {
                Ok(marker) => {
                    statements.push(marker_statement(marker));
                    continue;
                }
                Err(fail) if self.halted() => return Err(fail),
                Err(_) => {}
            }
            match self.attempt(|p| {
                p.indent();
                p.block_statement()
            }) {
                Ok(statement) => statements.push(statement),
                Err(fail) if self.halted() => return Err(fail),
                Err(_) => return Ok(statements),
            }
        }
    }

    /// One entry of a statement list: a local type declaration, a local
    /// variable declaration, or any other statement.
    pub(crate) fn block_statement(&mut self) -> PResult<Stmt> {
        alt!(
            self,
            Self::type_declaration_statement,
            Self::local_variable_declaration,
            Self::statement,
        )
    }

    fn type_declaration_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        let declaration = self.class_or_interface_declaration()?;
        Ok(Stmt::TypeDeclarationStatement(TypeDeclarationStatement {
            declaration,
            loc: self.loc_from(start),
        }))
    }

    fn local_variable_declaration(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        let (modifiers, variable_type, fragments) = self.variable_declaration()?;
        self.sym_line(";")?;
        Ok(Stmt::VariableDeclarationStatement(
            VariableDeclarationStatement {
                modifiers,
                variable_type,
                fragments,
                loc: self.loc_from(start),
            },
        ))
    }

    /// `modifiers type name[] = init, ...` without the trailing
    /// terminator; shared between declaration statements, for
    /// initializers, and try resources.
    pub(crate) fn variable_declaration(
        &mut self,
    ) -> PResult<(Vec<ExtendedModifier>, Ty, Vec<VariableDeclarationFragment>)> {
        let modifiers = self.modifiers()?;
        let variable_type = self.ty()?;
        let first = self.variable_declarator()?;
        let rest = self.many(|p| {
            p.sym(",")?;
            p.variable_declarator()
        })?;
        Ok((modifiers, variable_type, build_list(first, rest)))
    }

    pub(crate) fn variable_declarator(&mut self) -> PResult<VariableDeclarationFragment> {
        let start = self.pos;
        let name = self.ident()?;
        let extra_dimensions = self.dims()?;
        let initializer = self.opt(|p| {
            p.sym_not("=", b"=")?;
            p.variable_initializer()
        })?;
        Ok(VariableDeclarationFragment {
            name,
            extra_dimensions,
            initializer,
            loc: self.loc_from(start),
        })
    }

    pub(crate) fn variable_declaration_expression(
        &mut self,
    ) -> PResult<VariableDeclarationExpression> {
        let start = self.pos;
        let (modifiers, variable_type, fragments) = self.variable_declaration()?;
        Ok(VariableDeclarationExpression {
            modifiers,
            variable_type,
            fragments,
            loc: self.loc_from(start),
        })
    }

    fn statement(&mut self) -> PResult<Stmt> {
        alt!(
            self,
            |p: &mut Self| p.block().map(Stmt::Block),
            Self::if_statement,
            Self::for_statement,
            Self::while_statement,
            Self::do_statement,
            Self::try_statement,
            Self::switch_statement,
            Self::synchronized_statement,
            Self::return_statement,
            Self::throw_statement,
            Self::break_statement,
            Self::continue_statement,
            Self::assert_statement,
            Self::empty_statement,
            Self::labeled_statement,
            Self::explicit_constructor_invocation,
            Self::expression_statement,
        )
    }

    fn if_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("if")?;
        self.sym("(")?;
        let expression = self.expression()?;
        self.sym(")")?;
        let then_statement = self.statement()?;
        // The then-branch may have stopped at a line boundary.
        let else_statement = self.opt(|p| {
            p.spacing()?;
            p.word("else")?;
            p.statement()
        })?;
        Ok(Stmt::IfStatement(IfStatement {
            expression: Box::new(expression),
            then_statement: Box::new(then_statement),
            else_statement: else_statement.map(Box::new),
            loc: self.loc_from(start),
        }))
    }

    fn for_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("for")?;
        self.sym("(")?;
        alt!(
            self,
            |p: &mut Self| {
                let parameter = p.formal_parameter()?;
                p.sym_not(":", b":")?;
                let expression = p.expression()?;
                p.sym(")")?;
                let body = p.statement()?;
                Ok(Stmt::EnhancedForStatement(EnhancedForStatement {
                    parameter,
                    expression: Box::new(expression),
                    body: Box::new(body),
                    loc: p.loc_from(start),
                }))
            },
            |p: &mut Self| {
                let initializers = alt!(
                    p,
                    |p: &mut Self| p
                        .variable_declaration_expression()
                        .map(|e| vec![Expr::VariableDeclarationExpression(e)]),
                    Self::expression_list,
                    |_: &mut Self| Ok(Vec::new()),
                )?;
                p.sym(";")?;
                let expression = p.opt(Self::expression)?;
                p.sym(";")?;
                let updaters = alt!(p, Self::expression_list, |_: &mut Self| Ok(Vec::new()))?;
                p.sym(")")?;
                let body = p.statement()?;
                Ok(Stmt::ForStatement(ForStatement {
                    initializers,
                    expression: expression.map(Box::new),
                    updaters,
                    body: Box::new(body),
                    loc: p.loc_from(start),
                }))
            },
        )
    }

    fn expression_list(&mut self) -> PResult<Vec<Expr>> {
        let first = self.expression()?;
        let rest = self.many(|p| {
            p.sym(",")?;
            p.expression()
        })?;
        Ok(build_list(first, rest))
    }

    fn while_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("while")?;
        self.sym("(")?;
        let expression = self.expression()?;
        self.sym(")")?;
        let body = self.statement()?;
        Ok(Stmt::WhileStatement(WhileStatement {
            expression: Box::new(expression),
            body: Box::new(body),
            loc: self.loc_from(start),
        }))
    }

    fn do_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("do")?;
        let body = self.statement()?;
        self.spacing()?;
        self.word("while")?;
        self.sym("(")?;
        let expression = self.expression()?;
        self.sym(")")?;
        self.sym_line(";")?;
        Ok(Stmt::DoStatement(DoStatement {
            body: Box::new(body),
            expression: Box::new(expression),
            loc: self.loc_from(start),
        }))
    }

    fn try_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("try")?;
        let resources = self
            .opt(|p| {
                p.sym("(")?;
                let first = p.variable_declaration_expression()?;
                let rest = p.many(|p| {
                    p.sym(";")?;
                    p.variable_declaration_expression()
                })?;
                let _ = p.opt(|p| p.sym(";"))?;
                p.sym(")")?;
                Ok(build_list(first, rest))
            })?
            .unwrap_or_default();
        let body = self.block()?;
        let catch_clauses = self.many(|p| {
            p.spacing()?;
            p.catch_clause()
        })?;
        let finally_block = self.opt(|p| {
            p.spacing()?;
            p.word("finally")?;
            p.block()
        })?;
        Ok(Stmt::TryStatement(TryStatement {
            resources,
            body,
            catch_clauses,
            finally_block,
            loc: self.loc_from(start),
        }))
    }

    fn catch_clause(&mut self) -> PResult<CatchClause> {
        let start = self.pos;
        self.word("catch")?;
        self.sym("(")?;
        let formal_start = self.pos;
        let modifiers = self.modifiers()?;
        let catch_type = self.catch_type()?;
        let name = self.ident()?;
        let exception = SingleVariableDeclaration {
            modifiers,
            parameter_type: Some(catch_type),
            varargs: false,
            name,
            extra_dimensions: 0,
            loc: self.loc_from(formal_start),
        };
        self.sym(")")?;
        let body = self.block()?;
        Ok(CatchClause {
            exception,
            body,
            loc: self.loc_from(start),
        })
    }

    fn switch_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("switch")?;
        self.sym("(")?;
        let expression = self.expression()?;
        self.sym(")")?;
        self.sym_line("{")?;
        let mut statements = Vec::new();
        loop {
            match self.attempt(Self::source_marker) {
                Ok(marker) => {
                    statements.push(marker_statement(marker));
                    continue;
                }
                Err(fail) if self.halted() => return Err(fail),
                Err(_) => {}
            }
            match self.attempt(|p| {
                p.indent();
                alt!(p, Self::switch_case, Self::block_statement)
            }) {
                Ok(statement) => statements.push(statement),
                Err(fail) if self.halted() => return Err(fail),
                Err(_) => break,
            }
        }
        self.indent();
        self.sym_line("}")?;
        Ok(Stmt::SwitchStatement(SwitchStatement {
            expression: Box::new(expression),
            statements,
            loc: self.loc_from(start),
        }))
    }

    /// `case e:` or `default:`, kept inline in the switch body.
    fn switch_case(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        let expression = alt!(
            self,
            |p: &mut Self| {
                p.word("case")?;
                p.expression().map(Some)
            },
            |p: &mut Self| p.word("default").map(|_| None),
        )?;
        self.sym_line(":")?;
        Ok(Stmt::SwitchCase(SwitchCase {
            expression: expression.map(Box::new),
            loc: self.loc_from(start),
        }))
    }

    fn synchronized_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("synchronized")?;
        self.sym("(")?;
        let expression = self.expression()?;
        self.sym(")")?;
        let body = self.block()?;
        Ok(Stmt::SynchronizedStatement(SynchronizedStatement {
            expression: Box::new(expression),
            body,
            loc: self.loc_from(start),
        }))
    }

    fn return_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("return")?;
        let expression = self.opt(Self::expression)?;
        self.sym_line(";")?;
        Ok(Stmt::ReturnStatement(ReturnStatement {
            expression: expression.map(Box::new),
            loc: self.loc_from(start),
        }))
    }

    fn throw_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("throw")?;
        let expression = self.expression()?;
        self.sym_line(";")?;
        Ok(Stmt::ThrowStatement(ThrowStatement {
            expression: Box::new(expression),
            loc: self.loc_from(start),
        }))
    }

    fn break_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("break")?;
        let label = self.opt(Self::ident)?;
        self.sym_line(";")?;
        Ok(Stmt::BreakStatement(BreakStatement {
            label,
            loc: self.loc_from(start),
        }))
    }

    fn continue_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("continue")?;
        let label = self.opt(Self::ident)?;
        self.sym_line(";")?;
        Ok(Stmt::ContinueStatement(ContinueStatement {
            label,
            loc: self.loc_from(start),
        }))
    }

    fn assert_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.word("assert")?;
        let expression = self.expression()?;
        let message = self.opt(|p| {
            p.sym_not(":", b":")?;
            p.expression()
        })?;
        self.sym_line(";")?;
        Ok(Stmt::AssertStatement(AssertStatement {
            expression: Box::new(expression),
            message: message.map(Box::new),
            loc: self.loc_from(start),
        }))
    }

    fn empty_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        self.sym_line(";")?;
        Ok(Stmt::EmptyStatement(EmptyStatement {
            loc: self.loc_from(start),
        }))
    }

    fn labeled_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        let label = self.ident()?;
        self.sym_not(":", b":")?;
        let body = self.statement()?;
        Ok(Stmt::LabeledStatement(LabeledStatement {
            label,
            body: Box::new(body),
            loc: self.loc_from(start),
        }))
    }

    /// `this(...)` or `super(...)` heading a constructor body.
    fn explicit_constructor_invocation(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        let type_arguments = self.opt(Self::type_arguments)?.unwrap_or_default();
        let own = alt!(
            self,
            |p: &mut Self| p.word("this").map(|_| true),
            |p: &mut Self| p.word("super").map(|_| false),
        )?;
        let arguments = self.arguments()?;
        self.sym_line(";")?;
        if own {
            Ok(Stmt::ConstructorInvocation(ConstructorInvocation {
                type_arguments,
                arguments,
                loc: self.loc_from(start),
            }))
        } else {
            Ok(Stmt::SuperConstructorInvocation(
                SuperConstructorInvocation {
                    type_arguments,
                    arguments,
                    loc: self.loc_from(start),
                },
            ))
        }
    }

    fn expression_statement(&mut self) -> PResult<Stmt> {
        let start = self.pos;
        let expression = self.expression()?;
        self.sym_line(";")?;
        Ok(Stmt::ExpressionStatement(ExpressionStatement {
            expression: Box::new(expression),
            loc: self.loc_from(start),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse_block, parse_statement};

    fn stmt(source: &str) -> Stmt {
        parse_statement(source.as_bytes()).unwrap()
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        match stmt("if (a) if (b) f(); else g();") {
            Stmt::IfStatement(outer) => {
                assert!(outer.else_statement.is_none());
                match *outer.then_statement {
                    Stmt::IfStatement(inner) => assert!(inner.else_statement.is_some()),
                    other => panic!("expected nested if, got {:?}", other),
                }
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_local_variable_declaration_fragments() {
        match stmt("int a = 1, b[] = {2};") {
            Stmt::VariableDeclarationStatement(s) => {
                assert_eq!(s.fragments.len(), 2);
                assert_eq!(s.fragments[0].extra_dimensions, 0);
                assert_eq!(s.fragments[1].extra_dimensions, 1);
                assert!(s.fragments[1].initializer.is_some());
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_call_is_not_a_declaration() {
        match stmt("a.b();") {
            Stmt::ExpressionStatement(s) => {
                assert!(matches!(*s.expression, Expr::MethodInvocation(_)));
            }
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_for_forms() {
        match stmt("for (int i = 0; i < n; i++) f(i);") {
            Stmt::ForStatement(s) => {
                assert_eq!(s.initializers.len(), 1);
                assert!(s.expression.is_some());
                assert_eq!(s.updaters.len(), 1);
            }
            other => panic!("expected for, got {:?}", other),
        }
        match stmt("for (String s : list) f(s);") {
            Stmt::EnhancedForStatement(s) => {
                assert_eq!(s.parameter.name.identifier, "s");
            }
            other => panic!("expected enhanced for, got {:?}", other),
        }
    }

    #[test]
    fn test_do_while() {
        match stmt("do { f(); } while (x);") {
            Stmt::DoStatement(s) => assert!(matches!(*s.body, Stmt::Block(_))),
            other => panic!("expected do, got {:?}", other),
        }
    }

    #[test]
    fn test_try_multi_catch_and_finally() {
        let source = "try (Reader r = open()) { f(); } catch (A | B e) { g(); } finally { h(); }";
        match stmt(source) {
            Stmt::TryStatement(s) => {
                assert_eq!(s.resources.len(), 1);
                assert_eq!(s.catch_clauses.len(), 1);
                assert!(matches!(
                    s.catch_clauses[0].exception.parameter_type,
                    Some(Ty::UnionType(_))
                ));
                assert!(s.finally_block.is_some());
            }
            other => panic!("expected try, got {:?}", other),
        }
    }

    #[test]
    fn test_switch_cases_inline() {
        let source = "switch (x) {\ncase 1:\nf();\nbreak;\ndefault:\ng();\n}";
        match stmt(source) {
            Stmt::SwitchStatement(s) => {
                let cases = s
                    .statements
                    .iter()
                    .filter(|s| matches!(s, Stmt::SwitchCase(_)))
                    .count();
                assert_eq!(cases, 2);
            }
            other => panic!("expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_labeled_break_and_continue() {
        match stmt("outer: while (x) break outer;") {
            Stmt::LabeledStatement(s) => {
                assert_eq!(s.label.identifier, "outer");
                match *s.body {
                    Stmt::WhileStatement(w) => match *w.body {
                        Stmt::BreakStatement(b) => {
                            assert_eq!(b.label.unwrap().identifier, "outer");
                        }
                        other => panic!("expected break, got {:?}", other),
                    },
                    other => panic!("expected while, got {:?}", other),
                }
            }
            other => panic!("expected labeled statement, got {:?}", other),
        }
    }

    #[test]
    fn test_assert_with_message() {
        match stmt("assert x > 0 : \"bad\";") {
            Stmt::AssertStatement(s) => assert!(s.message.is_some()),
            other => panic!("expected assert, got {:?}", other),
        }
    }

    #[test]
    fn test_constructor_invocations() {
        assert!(matches!(stmt("this(1);"), Stmt::ConstructorInvocation(_)));
        assert!(matches!(
            stmt("super(1, 2);"),
            Stmt::SuperConstructorInvocation(_)
        ));
        // `this.f()` stays an expression statement.
        assert!(matches!(stmt("this.f();"), Stmt::ExpressionStatement(_)));
    }

    #[test]
    fn test_block_keeps_comment_and_blank_markers() {
        let source = "{\nint a = 0;\n// update\n\na = 1;\n}";
        let block = parse_block(source.as_bytes()).unwrap();
        let kinds = block
            .statements
            .iter()
            .map(|s| match s {
                Stmt::VariableDeclarationStatement(_) => "decl",
                Stmt::EndOfLineComment(_) => "comment",
                Stmt::LineEmpty(_) => "blank",
                Stmt::ExpressionStatement(_) => "expr",
                other => panic!("unexpected statement {:?}", other),
            })
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["decl", "comment", "blank", "expr"]);
    }

    #[test]
    fn test_local_class_declaration() {
        match stmt("class Local { }") {
            Stmt::TypeDeclarationStatement(s) => {
                assert_eq!(s.declaration.name.identifier, "Local");
            }
            other => panic!("expected local class, got {:?}", other),
        }
    }
}

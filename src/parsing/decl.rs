//! Declaration grammar: compilation units, type declarations, members,
//! modifiers, and annotations.
//!
//! Member lists are streams like statement lists: comment lines and
//! blank lines between members are captured as marker declarations.
//! Annotation-type bodies get their own member ordering so that
//! `int value() default 0;` becomes an annotation member rather than a
//! method.

use crate::ast::{
    Annotation, AnnotationTypeDeclaration, AnnotationTypeMemberDeclaration, BodyDecl,
    CompilationUnit, EndOfLineComment, EnumConstantDeclaration, EnumDeclaration, Expr,
    ExtendedModifier, FieldDeclaration, ImportDeclaration, Initializer, JavaDocComment,
    LineEmpty, MarkerAnnotation, MemberValuePair, MethodDeclaration, Modifier, ModifierKeyword,
    Name, NormalAnnotation, PackageDeclaration, SingleMemberAnnotation, SingleVariableDeclaration,
    TraditionalComment, Ty, TypeDecl, TypeDeclaration,
};
use crate::builder::{build_list, set_once};
use crate::parsing::lexical::SourceMarker;
use crate::parsing::{alt, PResult, Parser};

enum AnnotationArgs {
    Pairs(Vec<MemberValuePair>),
    Single(Expr),
}

fn marker_body_decl(marker: SourceMarker) -> BodyDecl {
    match marker {
        SourceMarker::EndOfLine { comment, loc } => {
            BodyDecl::EndOfLineComment(EndOfLineComment { comment, loc })
        }
        SourceMarker::Traditional { comment, loc } => {
            BodyDecl::TraditionalComment(TraditionalComment { comment, loc })
        }
        SourceMarker::JavaDoc { comment, loc } => {
            BodyDecl::JavaDocComment(JavaDocComment { comment, loc })
        }
        SourceMarker::Blank { loc } => BodyDecl::LineEmpty(LineEmpty { loc }),
    }
}

impl Parser {
    pub(crate) fn compilation_unit(&mut self) -> PResult<CompilationUnit> {
        let start = self.pos;
        let package = self.opt(Self::package_declaration)?;
        let imports = self.many(|p| {
            p.spacing()?;
            p.import_declaration()
        })?;
        let types = self.many(|p| {
            p.spacing()?;
            p.type_decl()
        })?;
        self.spacing()?;
        Ok(CompilationUnit {
            package,
            imports,
            types,
            loc: self.loc_from(start),
        })
    }

    fn package_declaration(&mut self) -> PResult<PackageDeclaration> {
        let start = self.pos;
        let annotations = self.many(Self::annotation)?;
        self.word("package")?;
        let name = self.qualified_name()?;
        self.sym(";")?;
        Ok(PackageDeclaration {
            annotations,
            name,
            loc: self.loc_from(start),
        })
    }

    fn import_declaration(&mut self) -> PResult<ImportDeclaration> {
        let start = self.pos;
        self.word("import")?;
        let static_import = self.opt(|p| p.word("static"))?.is_some();
        let name = self.qualified_name()?;
        let on_demand = self
            .opt(|p| {
                p.sym(".")?;
                p.sym("*")
            })?
            .is_some();
        self.sym(";")?;
        Ok(ImportDeclaration {
            static_import,
            name,
            on_demand,
            loc: self.loc_from(start),
        })
    }

    // ------------------------------------------------------------------
    // Modifiers and annotations
    // ------------------------------------------------------------------

    pub(crate) fn modifiers(&mut self) -> PResult<Vec<ExtendedModifier>> {
        self.many(|p| {
            alt!(
                p,
                |p: &mut Self| p.annotation().map(ExtendedModifier::Annotation),
                |p: &mut Self| p.modifier().map(ExtendedModifier::Modifier),
            )
        })
    }

    fn modifier(&mut self) -> PResult<Modifier> {
        let start = self.pos;
        let keyword = alt!(
            self,
            |p: &mut Self| p.word("public").map(|_| ModifierKeyword::Public),
            |p: &mut Self| p.word("protected").map(|_| ModifierKeyword::Protected),
            |p: &mut Self| p.word("private").map(|_| ModifierKeyword::Private),
            |p: &mut Self| p.word("static").map(|_| ModifierKeyword::Static),
            |p: &mut Self| p.word("abstract").map(|_| ModifierKeyword::Abstract),
            |p: &mut Self| p.word("final").map(|_| ModifierKeyword::Final),
            |p: &mut Self| p.word("native").map(|_| ModifierKeyword::Native),
            |p: &mut Self| p.word("synchronized").map(|_| ModifierKeyword::Synchronized),
            |p: &mut Self| p.word("transient").map(|_| ModifierKeyword::Transient),
            |p: &mut Self| p.word("volatile").map(|_| ModifierKeyword::Volatile),
            |p: &mut Self| p.word("strictfp").map(|_| ModifierKeyword::Strictfp),
            |p: &mut Self| p.word("default").map(|_| ModifierKeyword::Default),
        )?;
        Ok(Modifier {
            keyword,
            loc: self.loc_from(start),
        })
    }

    pub(crate) fn annotation(&mut self) -> PResult<Annotation> {
        let start = self.pos;
        self.sym("@")?;
        let type_name = self.qualified_name()?;
        let args = self.opt(|p| {
            p.sym("(")?;
            let args = alt!(
                p,
                |p: &mut Self| {
                    let first = p.member_value_pair()?;
                    let rest = p.many(|p| {
                        p.sym(",")?;
                        p.member_value_pair()
                    })?;
                    Ok(AnnotationArgs::Pairs(build_list(first, rest)))
                },
                |p: &mut Self| p.annotation_value().map(AnnotationArgs::Single),
                |_: &mut Self| Ok(AnnotationArgs::Pairs(Vec::new())),
            )?;
            p.sym(")")?;
            Ok(args)
        })?;
        let loc = self.loc_from(start);
        Ok(match args {
            None => Annotation::MarkerAnnotation(MarkerAnnotation { type_name, loc }),
            Some(AnnotationArgs::Single(value)) => {
                Annotation::SingleMemberAnnotation(SingleMemberAnnotation {
                    type_name,
                    value: Box::new(value),
                    loc,
                })
            }
            Some(AnnotationArgs::Pairs(values)) => {
                Annotation::NormalAnnotation(NormalAnnotation {
                    type_name,
                    values,
                    loc,
                })
            }
        })
    }

    fn member_value_pair(&mut self) -> PResult<MemberValuePair> {
        let start = self.pos;
        let name = self.ident()?;
        self.sym_not("=", b"=")?;
        let value = self.annotation_value()?;
        Ok(MemberValuePair {
            name,
            value,
            loc: self.loc_from(start),
        })
    }

    // ------------------------------------------------------------------
    // Type declarations
    // ------------------------------------------------------------------

    pub(crate) fn type_decl(&mut self) -> PResult<TypeDecl> {
        alt!(
            self,
            |p: &mut Self| p
                .class_or_interface_declaration()
                .map(TypeDecl::TypeDeclaration),
            |p: &mut Self| p.enum_declaration().map(TypeDecl::EnumDeclaration),
            |p: &mut Self| p
                .annotation_type_declaration()
                .map(TypeDecl::AnnotationTypeDeclaration),
        )
    }

    pub(crate) fn class_or_interface_declaration(&mut self) -> PResult<TypeDeclaration> {
        let start = self.pos;
        let modifiers = self.modifiers()?;
        let interface = alt!(
            self,
            |p: &mut Self| p.word("class").map(|_| false),
            |p: &mut Self| p.word("interface").map(|_| true),
        )?;
        let name = self.ident()?;
        let type_parameters = self.opt(Self::type_parameters)?.unwrap_or_default();
        // Each heritage clause writes its own slot exactly once.
        let mut superclass_type = None;
        let mut super_interface_types = None;
        if interface {
            if let Some(types) = self.opt(|p| {
                p.word("extends")?;
                p.type_list()
            })? {
                set_once(&mut super_interface_types, "super_interface_types", types);
            }
        } else {
            if let Some(ty) = self.opt(|p| {
                p.word("extends")?;
                p.class_or_interface_type()
            })? {
                set_once(&mut superclass_type, "superclass_type", ty);
            }
            if let Some(types) = self.opt(|p| {
                p.word("implements")?;
                p.type_list()
            })? {
                set_once(&mut super_interface_types, "super_interface_types", types);
            }
        }
        let body_declarations = self.class_body()?;
        Ok(TypeDeclaration {
            modifiers,
            interface,
            name,
            type_parameters,
            superclass_type,
            super_interface_types: super_interface_types.unwrap_or_default(),
            body_declarations,
            loc: self.loc_from(start),
        })
    }

    fn type_list(&mut self) -> PResult<Vec<Ty>> {
        let first = self.class_or_interface_type()?;
        let rest = self.many(|p| {
            p.sym(",")?;
            p.class_or_interface_type()
        })?;
        Ok(build_list(first, rest))
    }

    fn enum_declaration(&mut self) -> PResult<EnumDeclaration> {
        let start = self.pos;
        let modifiers = self.modifiers()?;
        self.word("enum")?;
        let name = self.ident()?;
        let super_interface_types = self
            .opt(|p| {
                p.word("implements")?;
                p.type_list()
            })?
            .unwrap_or_default();
        self.sym_line("{")?;
        let enum_constants = match self.opt(|p| {
            p.spacing()?;
            let first = p.enum_constant()?;
            let rest = p.many(|p| {
                p.sym(",")?;
                p.spacing()?;
                p.enum_constant()
            })?;
            Ok(build_list(first, rest))
        })? {
            Some(constants) => constants,
            None => Vec::new(),
        };
        let _ = self.opt(|p| p.sym(","))?;
        let body_declarations = match self.opt(|p| {
            p.spacing()?;
            p.sym_line(";")?;
            p.member_stream(false)
        })? {
            Some(declarations) => declarations,
            None => Vec::new(),
        };
        self.spacing()?;
        self.sym_line("}")?;
        Ok(EnumDeclaration {
            modifiers,
            name,
            super_interface_types,
            enum_constants,
            body_declarations,
            loc: self.loc_from(start),
        })
    }

    fn enum_constant(&mut self) -> PResult<EnumConstantDeclaration> {
        let start = self.pos;
        let modifiers = self.many(|p| p.annotation().map(ExtendedModifier::Annotation))?;
        let name = self.ident()?;
        let arguments = self.opt(Self::arguments)?.unwrap_or_default();
        let anonymous_class_body = self.opt(|p| {
            let body = p.class_body()?;
            p.spacing()?;
            Ok(body)
        })?;
        Ok(EnumConstantDeclaration {
            modifiers,
            name,
            arguments,
            anonymous_class_body,
            loc: self.loc_from(start),
        })
    }

    fn annotation_type_declaration(&mut self) -> PResult<AnnotationTypeDeclaration> {
        let start = self.pos;
        let modifiers = self.modifiers()?;
        self.sym("@")?;
        self.word("interface")?;
        let name = self.ident()?;
        self.sym_line("{")?;
        let body_declarations = self.member_stream(true)?;
        self.indent();
        self.sym_line("}")?;
        Ok(AnnotationTypeDeclaration {
            modifiers,
            name,
            body_declarations,
            loc: self.loc_from(start),
        })
    }

    // ------------------------------------------------------------------
    // Type bodies and members
    // ------------------------------------------------------------------

    pub(crate) fn class_body(&mut self) -> PResult<Vec<BodyDecl>> {
        self.sym_line("{")?;
        let declarations = self.member_stream(false)?;
        self.indent();
        self.sym_line("}")?;
        Ok(declarations)
    }

    fn member_stream(&mut self, annotation_body: bool) -> PResult<Vec<BodyDecl>> {
        let mut declarations = Vec::new();
        loop {
            match self.attempt(Self::source_marker) {
                Ok(marker) => {
                    declarations.push(marker_body_decl(marker));
                    continue;
                }
                Err(fail) if self.halted() => return Err(fail),
                Err(_) => {}
            }
            match self.attempt(|p| {
                p.indent();
                p.body_decl(annotation_body)
            }) {
                Ok(declaration) => declarations.push(declaration),
                Err(fail) if self.halted() => return Err(fail),
                Err(_) => return Ok(declarations),
            }
        }
    }

    fn body_decl(&mut self, annotation_body: bool) -> PResult<BodyDecl> {
        if annotation_body {
            if let Some(member) = self.opt(Self::annotation_type_member)? {
                return Ok(BodyDecl::AnnotationTypeMemberDeclaration(member));
            }
        }
        alt!(
            self,
            |p: &mut Self| p.initializer_decl().map(BodyDecl::Initializer),
            |p: &mut Self| p.type_decl().map(|d| BodyDecl::TypeDeclaration(Box::new(d))),
            |p: &mut Self| p.method_declaration().map(BodyDecl::MethodDeclaration),
            |p: &mut Self| p.field_declaration().map(BodyDecl::FieldDeclaration),
        )
    }

    fn initializer_decl(&mut self) -> PResult<Initializer> {
        let start = self.pos;
        let modifiers = self.modifiers()?;
        let body = self.block()?;
        Ok(Initializer {
            modifiers,
            body,
            loc: self.loc_from(start),
        })
    }

    fn method_declaration(&mut self) -> PResult<MethodDeclaration> {
        let start = self.pos;
        let modifiers = self.modifiers()?;
        let type_parameters = self.opt(Self::type_parameters)?.unwrap_or_default();
        // A constructor is a bare name directly heading a parameter list.
        let constructor_name = self.attempt(|p| {
            let name = p.ident()?;
            p.peek(|p| p.literal("("))?;
            Ok(name)
        });
        match constructor_name {
            Ok(name) => {
                let parameters = self.formal_parameters()?;
                let thrown_exceptions = self.throws_clause()?;
                let body = self.block()?;
                Ok(MethodDeclaration {
                    modifiers,
                    constructor: true,
                    type_parameters,
                    return_type2: None,
                    name,
                    parameters,
                    extra_dimensions: 0,
                    thrown_exceptions,
                    body: Some(body),
                    loc: self.loc_from(start),
                })
            }
            Err(fail) if self.halted() => Err(fail),
            Err(_) => {
                let return_type2 = self.ty_or_void()?;
                let name = self.ident()?;
                let parameters = self.formal_parameters()?;
                let extra_dimensions = self.dims()?;
                let thrown_exceptions = self.throws_clause()?;
                let body = alt!(
                    self,
                    |p: &mut Self| p.block().map(Some),
                    |p: &mut Self| p.sym_line(";").map(|_| None),
                )?;
                Ok(MethodDeclaration {
                    modifiers,
                    constructor: false,
                    type_parameters,
                    return_type2: Some(return_type2),
                    name,
                    parameters,
                    extra_dimensions,
                    thrown_exceptions,
                    body,
                    loc: self.loc_from(start),
                })
            }
        }
    }

    pub(crate) fn formal_parameters(&mut self) -> PResult<Vec<SingleVariableDeclaration>> {
        self.sym("(")?;
        let parameters = match self.opt(|p| {
            let first = p.formal_parameter()?;
            let rest = p.many(|p| {
                p.sym(",")?;
                p.formal_parameter()
            })?;
            Ok(build_list(first, rest))
        })? {
            Some(parameters) => parameters,
            None => Vec::new(),
        };
        self.sym(")")?;
        Ok(parameters)
    }

    pub(crate) fn formal_parameter(&mut self) -> PResult<SingleVariableDeclaration> {
        let start = self.pos;
        let modifiers = self.modifiers()?;
        let parameter_type = self.ty()?;
        let varargs = self.opt(|p| p.sym("..."))?.is_some();
        let name = self.ident()?;
        let extra_dimensions = self.dims()?;
        Ok(SingleVariableDeclaration {
            modifiers,
            parameter_type: Some(parameter_type),
            varargs,
            name,
            extra_dimensions,
            loc: self.loc_from(start),
        })
    }

    fn throws_clause(&mut self) -> PResult<Vec<Name>> {
        let names = self.opt(|p| {
            p.word("throws")?;
            let first = p.qualified_name()?;
            let rest = p.many(|p| {
                p.sym(",")?;
                p.qualified_name()
            })?;
            Ok(build_list(first, rest))
        })?;
        Ok(names.unwrap_or_default())
    }

    fn field_declaration(&mut self) -> PResult<FieldDeclaration> {
        let start = self.pos;
        let (modifiers, field_type, fragments) = self.variable_declaration()?;
        self.sym_line(";")?;
        Ok(FieldDeclaration {
            modifiers,
            field_type,
            fragments,
            loc: self.loc_from(start),
        })
    }

    fn annotation_type_member(&mut self) -> PResult<AnnotationTypeMemberDeclaration> {
        let start = self.pos;
        let modifiers = self.modifiers()?;
        let member_type = self.ty()?;
        let name = self.ident()?;
        self.sym("(")?;
        self.sym(")")?;
        let default_value = self.opt(|p| {
            p.word("default")?;
            p.annotation_value()
        })?;
        self.sym_line(";")?;
        Ok(AnnotationTypeMemberDeclaration {
            modifiers,
            member_type,
            name,
            default_value,
            loc: self.loc_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ModifierFlags;
    use crate::parsing::parse;

    fn unit(source: &str) -> CompilationUnit {
        parse(source.as_bytes()).unwrap()
    }

    fn only_type(unit: &CompilationUnit) -> &TypeDecl {
        assert_eq!(unit.types.len(), 1);
        &unit.types[0]
    }

    #[test]
    fn test_package_and_imports() {
        let u = unit("package com.example.app;\nimport java.util.List;\nimport static java.lang.Math.*;\nclass A { }\n");
        assert!(u.package.is_some());
        assert_eq!(u.imports.len(), 2);
        assert!(!u.imports[0].static_import);
        assert!(!u.imports[0].on_demand);
        assert!(u.imports[1].static_import);
        assert!(u.imports[1].on_demand);
    }

    #[test]
    fn test_class_heritage_and_modifiers() {
        let u = unit("public final class A<T> extends B implements C, D { }\n");
        match only_type(&u) {
            TypeDecl::TypeDeclaration(d) => {
                assert!(!d.interface);
                assert_eq!(d.type_parameters.len(), 1);
                assert!(d.superclass_type.is_some());
                assert_eq!(d.super_interface_types.len(), 2);
                let flags = ModifierFlags::of(&d.modifiers);
                assert!(flags.contains(ModifierFlags::PUBLIC | ModifierFlags::FINAL));
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_interface_extends_list() {
        let u = unit("interface I extends A, B { }\n");
        match only_type(&u) {
            TypeDecl::TypeDeclaration(d) => {
                assert!(d.interface);
                assert!(d.superclass_type.is_none());
                assert_eq!(d.super_interface_types.len(), 2);
            }
            other => panic!("expected interface, got {:?}", other),
        }
    }

    #[test]
    fn test_members_constructor_field_method() {
        let source = "class A {\nprivate int x;\nA(int x) { this.x = x; }\nint get() { return x; }\nstatic { }\n}\n";
        let u = unit(source);
        match only_type(&u) {
            TypeDecl::TypeDeclaration(d) => {
                let mut kinds = Vec::new();
                for m in &d.body_declarations {
                    match m {
                        BodyDecl::FieldDeclaration(_) => kinds.push("field"),
                        BodyDecl::MethodDeclaration(m) => {
                            kinds.push(if m.constructor { "ctor" } else { "method" })
                        }
                        BodyDecl::Initializer(_) => kinds.push("init"),
                        _ => {}
                    }
                }
                assert_eq!(kinds, vec!["field", "ctor", "method", "init"]);
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_method_shapes() {
        let source = "abstract class A {\nabstract <T> T id(T x) throws E1, E2;\nvoid f(int... rest) { }\n}\n";
        let u = unit(source);
        match only_type(&u) {
            TypeDecl::TypeDeclaration(d) => {
                let methods = d
                    .body_declarations
                    .iter()
                    .filter_map(|m| match m {
                        BodyDecl::MethodDeclaration(m) => Some(m),
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                assert_eq!(methods.len(), 2);
                assert_eq!(methods[0].type_parameters.len(), 1);
                assert_eq!(methods[0].thrown_exceptions.len(), 2);
                assert!(methods[0].body.is_none());
                assert!(methods[1].parameters[0].varargs);
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_constants_and_members() {
        let source = "enum Color {\nRED(1), GREEN(2) { void f() { } },\nBLUE;\nint code() { return 0; }\n}\n";
        let u = unit(source);
        match only_type(&u) {
            TypeDecl::EnumDeclaration(d) => {
                assert_eq!(d.enum_constants.len(), 3);
                assert_eq!(d.enum_constants[0].arguments.len(), 1);
                assert!(d.enum_constants[1].anonymous_class_body.is_some());
                assert!(d.enum_constants[2].arguments.is_empty());
                assert!(d
                    .body_declarations
                    .iter()
                    .any(|m| matches!(m, BodyDecl::MethodDeclaration(_))));
            }
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_annotation_type_declaration() {
        let source = "@interface Marker {\nint value() default 0;\n}\n";
        let u = unit(source);
        match only_type(&u) {
            TypeDecl::AnnotationTypeDeclaration(d) => {
                assert_eq!(d.name.identifier, "Marker");
                match &d.body_declarations[0] {
                    BodyDecl::AnnotationTypeMemberDeclaration(m) => {
                        assert_eq!(m.name.identifier, "value");
                        assert!(m.default_value.is_some());
                    }
                    other => panic!("expected annotation member, got {:?}", other),
                }
            }
            other => panic!("expected annotation type, got {:?}", other),
        }
    }

    #[test]
    fn test_annotation_forms_on_members() {
        let source = "class A {\n@Override\n@SuppressWarnings(\"x\")\n@Meta(name = \"n\", id = 2)\nvoid f() { }\n}\n";
        let u = unit(source);
        match only_type(&u) {
            TypeDecl::TypeDeclaration(d) => {
                let method = d
                    .body_declarations
                    .iter()
                    .find_map(|m| match m {
                        BodyDecl::MethodDeclaration(m) => Some(m),
                        _ => None,
                    })
                    .unwrap();
                let annotations = method
                    .modifiers
                    .iter()
                    .filter_map(|m| match m {
                        ExtendedModifier::Annotation(a) => Some(a),
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                assert_eq!(annotations.len(), 3);
                assert!(matches!(annotations[0], Annotation::MarkerAnnotation(_)));
                assert!(matches!(
                    annotations[1],
                    Annotation::SingleMemberAnnotation(_)
                ));
                match annotations[2] {
                    Annotation::NormalAnnotation(a) => assert_eq!(a.values.len(), 2),
                    other => panic!("expected normal annotation, got {:?}", other),
                }
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_member_markers_survive() {
        let source = "class A {\n// counter\nint x;\n\nint y;\n}\n";
        let u = unit(source);
        match only_type(&u) {
            TypeDecl::TypeDeclaration(d) => {
                let kinds = d
                    .body_declarations
                    .iter()
                    .map(|m| match m {
                        BodyDecl::EndOfLineComment(_) => "comment",
                        BodyDecl::LineEmpty(_) => "blank",
                        BodyDecl::FieldDeclaration(_) => "field",
                        other => panic!("unexpected member {:?}", other),
                    })
                    .collect::<Vec<_>>();
                assert_eq!(kinds, vec!["comment", "field", "blank", "field"]);
            }
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_and_anonymous_types() {
        let source = "class A {\nstatic class B { }\nObject o = new Object() {\nint x;\n};\n}\n";
        let u = unit(source);
        match only_type(&u) {
            TypeDecl::TypeDeclaration(d) => {
                assert!(d
                    .body_declarations
                    .iter()
                    .any(|m| matches!(m, BodyDecl::TypeDeclaration(_))));
                let field = d
                    .body_declarations
                    .iter()
                    .find_map(|m| match m {
                        BodyDecl::FieldDeclaration(f) => Some(f),
                        _ => None,
                    })
                    .unwrap();
                match field.fragments[0].initializer.as_ref().unwrap() {
                    Expr::ClassInstanceCreation(c) => {
                        assert!(c.anonymous_class_body.is_some());
                    }
                    other => panic!("expected creation, got {:?}", other),
                }
            }
            other => panic!("expected class, got {:?}", other),
        }
    }
}

//! Type grammar: primitive, class/interface, parameterized, array,
//! wildcard, and union types, plus type parameters and arguments.
//!
//! Nested generic closers need no special lexing: `>` is matched one
//! character at a time, so `Map<String, List<String>>` closes the inner
//! and outer argument lists with consecutive single `>` tokens.

use crate::ast::{
    Name, ParameterizedType, PrimitiveKind, PrimitiveType, QualifiedType, SimpleType, Ty,
    TypeParameter, UnionType, WildcardType,
};
use crate::builder::{build_array_type, build_list, build_qualified};
use crate::parsing::{alt, PResult, Parser};

impl Parser {
    /// `a.b.c` folded into nested qualified names.
    pub(crate) fn qualified_name(&mut self) -> PResult<Name> {
        let first = self.ident()?;
        let rest = self.many(|p| {
            p.sym(".")?;
            p.ident()
        })?;
        Ok(build_qualified(first, rest))
    }

    /// Any type usable in declarations: `(primitive | class) []*`.
    pub(crate) fn ty(&mut self) -> PResult<Ty> {
        let start = self.pos;
        let base = alt!(self, Self::primitive_type, Self::class_or_interface_type)?;
        let dims = self.dims()?;
        Ok(build_array_type(base, dims, self.loc_from(start)))
    }

    /// Return-type position: `void` or any type.
    pub(crate) fn ty_or_void(&mut self) -> PResult<Ty> {
        alt!(
            self,
            |p: &mut Self| {
                let start = p.pos;
                p.word("void")?;
                Ok(Ty::PrimitiveType(PrimitiveType {
                    primitive_type_code: PrimitiveKind::Void,
                    loc: p.loc_from(start),
                }))
            },
            Self::ty,
        )
    }

    pub(crate) fn primitive_type(&mut self) -> PResult<Ty> {
        let start = self.pos;
        let code = alt!(
            self,
            |p: &mut Self| p.word("byte").map(|_| PrimitiveKind::Byte),
            |p: &mut Self| p.word("short").map(|_| PrimitiveKind::Short),
            |p: &mut Self| p.word("char").map(|_| PrimitiveKind::Char),
            |p: &mut Self| p.word("int").map(|_| PrimitiveKind::Int),
            |p: &mut Self| p.word("long").map(|_| PrimitiveKind::Long),
            |p: &mut Self| p.word("float").map(|_| PrimitiveKind::Float),
            |p: &mut Self| p.word("double").map(|_| PrimitiveKind::Double),
            |p: &mut Self| p.word("boolean").map(|_| PrimitiveKind::Boolean),
        )?;
        Ok(Ty::PrimitiveType(PrimitiveType {
            primitive_type_code: code,
            loc: self.loc_from(start),
        }))
    }

    /// `a.B<C>.D` — identifier segments, each optionally parameterized.
    pub(crate) fn class_or_interface_type(&mut self) -> PResult<Ty> {
        let start = self.pos;
        let first = self.ident()?;
        let loc = self.loc_from(start);
        let mut ty = Ty::SimpleType(SimpleType {
            name: Name::SimpleName(first),
            loc,
        });
        if let Some(args) = self.opt(Self::type_arguments)? {
            ty = Ty::ParameterizedType(ParameterizedType {
                base: Box::new(ty),
                type_arguments: args,
                loc: self.loc_from(start),
            });
        }
        loop {
            let segment = self.attempt(|p| {
                p.sym(".")?;
                let name = p.ident()?;
                let args = p.opt(Self::type_arguments)?;
                Ok((name, args))
            });
            let (name, args) = match segment {
                Ok(segment) => segment,
                Err(_) if self.halted() => return Err(crate::parsing::Fail),
                Err(_) => break,
            };
            ty = Ty::QualifiedType(QualifiedType {
                qualifier: Box::new(ty),
                name,
                loc: self.loc_from(start),
            });
            if let Some(args) = args {
                ty = Ty::ParameterizedType(ParameterizedType {
                    base: Box::new(ty),
                    type_arguments: args,
                    loc: self.loc_from(start),
                });
            }
        }
        Ok(ty)
    }

    /// `<T, ? extends U>`
    pub(crate) fn type_arguments(&mut self) -> PResult<Vec<Ty>> {
        self.sym("<")?;
        let first = self.type_argument()?;
        let rest = self.many(|p| {
            p.sym(",")?;
            p.type_argument()
        })?;
        self.sym(">")?;
        Ok(build_list(first, rest))
    }

    fn type_argument(&mut self) -> PResult<Ty> {
        alt!(self, Self::wildcard_type, Self::ty)
    }

    fn wildcard_type(&mut self) -> PResult<Ty> {
        let start = self.pos;
        self.sym("?")?;
        let bound = self.opt(|p| {
            alt!(
                p,
                |p: &mut Self| {
                    p.word("extends")?;
                    Ok((true, p.ty()?))
                },
                |p: &mut Self| {
                    p.word("super")?;
                    Ok((false, p.ty()?))
                },
            )
        })?;
        let (upper_bound, bound) = match bound {
            Some((upper, ty)) => (upper, Some(Box::new(ty))),
            None => (true, None),
        };
        Ok(Ty::WildcardType(WildcardType {
            bound,
            upper_bound,
            loc: self.loc_from(start),
        }))
    }

    /// `<T extends A & B, U>`
    pub(crate) fn type_parameters(&mut self) -> PResult<Vec<TypeParameter>> {
        self.sym("<")?;
        let first = self.type_parameter()?;
        let rest = self.many(|p| {
            p.sym(",")?;
            p.type_parameter()
        })?;
        self.sym(">")?;
        Ok(build_list(first, rest))
    }

    fn type_parameter(&mut self) -> PResult<TypeParameter> {
        let start = self.pos;
        let name = self.ident()?;
        let type_bounds = match self.opt(|p| {
            p.word("extends")?;
            let first = p.class_or_interface_type()?;
            let rest = p.many(|p| {
                p.sym_not("&", b"&")?;
                p.class_or_interface_type()
            })?;
            Ok(build_list(first, rest))
        })? {
            Some(bounds) => bounds,
            None => Vec::new(),
        };
        Ok(TypeParameter {
            name,
            type_bounds,
            loc: self.loc_from(start),
        })
    }

    /// Zero or more `[]` dimension pairs.
    pub(crate) fn dims(&mut self) -> PResult<u32> {
        let pairs = self.many(|p| {
            p.sym("[")?;
            p.sym("]")
        })?;
        Ok(pairs.len() as u32)
    }

    /// Catch-formal type: `A | B | C` folded into a union when more
    /// than one alternative is present.
    pub(crate) fn catch_type(&mut self) -> PResult<Ty> {
        let start = self.pos;
        let first = self.class_or_interface_type()?;
        let rest = self.many(|p| {
            p.sym_not("|", b"|=")?;
            p.class_or_interface_type()
        })?;
        if rest.is_empty() {
            return Ok(first);
        }
        let types = build_list(first, rest);
        Ok(Ty::UnionType(UnionType {
            types,
            loc: self.loc_from(start),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ty(source: &str) -> Ty {
        let mut p = Parser::new(source.as_bytes());
        p.ty().unwrap()
    }

    #[test]
    fn test_primitive_and_array() {
        assert!(matches!(parse_ty("int"), Ty::PrimitiveType(_)));
        match parse_ty("int[][]") {
            Ty::ArrayType(outer) => {
                assert!(matches!(*outer.component_type, Ty::ArrayType(_)));
            }
            other => panic!("expected array type, got {:?}", other),
        }
    }

    #[test]
    fn test_parameterized_nested_closers() {
        match parse_ty("Map<String, List<String>>") {
            Ty::ParameterizedType(t) => {
                assert_eq!(t.type_arguments.len(), 2);
                assert!(matches!(t.type_arguments[1], Ty::ParameterizedType(_)));
            }
            other => panic!("expected parameterized type, got {:?}", other),
        }
    }

    #[test]
    fn test_qualified_type_segments() {
        match parse_ty("java.util.List") {
            Ty::QualifiedType(t) => assert_eq!(t.name.identifier, "List"),
            other => panic!("expected qualified type, got {:?}", other),
        }
    }

    #[test]
    fn test_wildcard_bounds() {
        let mut p = Parser::new(b"<? extends Number, ?>");
        let args = p.type_arguments().unwrap();
        assert_eq!(args.len(), 2);
        match &args[0] {
            Ty::WildcardType(w) => {
                assert!(w.upper_bound);
                assert!(w.bound.is_some());
            }
            other => panic!("expected wildcard, got {:?}", other),
        }
        assert!(matches!(&args[1], Ty::WildcardType(w) if w.bound.is_none()));
    }

    #[test]
    fn test_type_parameter_bounds() {
        let mut p = Parser::new(b"<T extends A & B, U>");
        let params = p.type_parameters().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].type_bounds.len(), 2);
        assert!(params[1].type_bounds.is_empty());
    }

    #[test]
    fn test_catch_union() {
        let mut p = Parser::new(b"IOException | SQLException e");
        match p.catch_type().unwrap() {
            Ty::UnionType(u) => assert_eq!(u.types.len(), 2),
            other => panic!("expected union type, got {:?}", other),
        }
    }
}

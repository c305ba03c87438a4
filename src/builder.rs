//! Pure tree-building helpers shared by the grammar actions.
//!
//! Operator precedence is never encoded here: every infix level folds
//! through the same left-associative helper, and which rule calls which
//! tighter rule is all that separates `+` from `*`.

use crate::ast::{
    ArrayType, Expr, InfixExpression, InfixOp, Loc, Name, QualifiedName, SimpleName, Ty,
};

/// Extent covering both argument extents.
pub fn span(a: Loc, b: Loc) -> Loc {
    Loc {
        start: a.start,
        end: b.end,
    }
}

/// Flattens the `head (separator item)*` match shape into one ordered
/// list.
pub fn build_list<T>(first: T, mut rest: Vec<T>) -> Vec<T> {
    rest.insert(0, first);
    rest
}

/// Folds `operand (op operand)*` into left-leaning nested infix nodes:
/// `a - b - c` becomes `(a - b) - c`.
pub fn build_infix_left(first: Expr, rest: Vec<(InfixOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |left, (operator, right)| {
        let loc = span(left.loc(), right.loc());
        Expr::InfixExpression(InfixExpression {
            operator,
            left_operand: Box::new(left),
            right_operand: Box::new(right),
            loc,
        })
    })
}

/// Folds a dotted identifier chain into nested qualified names:
/// `a.b.c` becomes `QualifiedName(QualifiedName(a, b), c)`.
pub fn build_qualified(first: SimpleName, rest: Vec<SimpleName>) -> Name {
    rest.into_iter().fold(Name::SimpleName(first), |qualifier, name| {
        let loc = span(qualifier.loc(), name.loc);
        Name::QualifiedName(QualifiedName {
            qualifier: Box::new(qualifier),
            name,
            loc,
        })
    })
}

/// Splits a name into (receiver expression, trailing simple name), for
/// rebuilding `a.b.c(...)` as a method invocation on `a.b`. A simple
/// name has no receiver. Any deeper qualifier becomes a field-access
/// chain so it can stand in expression position.
pub fn pop_qualified(name: Name) -> (Option<Expr>, SimpleName) {
    match name {
        Name::SimpleName(name) => (None, name),
        Name::QualifiedName(qualified) => (Some(Expr::from(*qualified.qualifier)), qualified.name),
    }
}

/// Wraps `component` in `dims` array-type layers, all sharing the full
/// extent `loc`.
pub fn build_array_type(component: Ty, dims: u32, loc: Loc) -> Ty {
    let mut ty = component;
    for _ in 0..dims {
        ty = Ty::ArrayType(ArrayType {
            component_type: Box::new(ty),
            loc,
        });
    }
    ty
}

/// Writes a node field exactly once. Each grammar action owns a
/// disjoint set of fields on the node it contributes to; a second write
/// to the same field is a bug in the grammar actions themselves, so it
/// is a fatal internal-invariant violation rather than an error value.
pub fn set_once<T>(slot: &mut Option<T>, field: &'static str, value: T) {
    if slot.is_some() {
        panic!("internal invariant violated: field `{}` written twice", field);
    }
    *slot = Some(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NumberLiteral;

    fn name(id: &str) -> SimpleName {
        SimpleName {
            identifier: id.to_owned(),
            loc: Loc::default(),
        }
    }

    fn num(token: &str) -> Expr {
        Expr::NumberLiteral(NumberLiteral {
            token: token.to_owned(),
            loc: Loc::default(),
        })
    }

    #[test]
    fn test_build_list_orders_head_first() {
        let list = build_list(1, vec![2, 3]);
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn test_infix_fold_is_left_leaning() {
        let e = build_infix_left(
            num("1"),
            vec![(InfixOp::Minus, num("2")), (InfixOp::Minus, num("3"))],
        );
        match e {
            Expr::InfixExpression(outer) => {
                assert_eq!(outer.operator, InfixOp::Minus);
                assert_eq!(*outer.right_operand, num("3"));
                match *outer.left_operand {
                    Expr::InfixExpression(inner) => {
                        assert_eq!(*inner.left_operand, num("1"));
                        assert_eq!(*inner.right_operand, num("2"));
                    }
                    other => panic!("expected nested infix, got {:?}", other),
                }
            }
            other => panic!("expected infix, got {:?}", other),
        }
    }

    #[test]
    fn test_build_qualified_nests_leftward() {
        let n = build_qualified(name("a"), vec![name("b"), name("c")]);
        match n {
            Name::QualifiedName(outer) => {
                assert_eq!(outer.name.identifier, "c");
                match *outer.qualifier {
                    Name::QualifiedName(inner) => {
                        assert_eq!(inner.name.identifier, "b");
                        assert_eq!(
                            *inner.qualifier,
                            Name::SimpleName(name("a"))
                        );
                    }
                    other => panic!("expected qualified name, got {:?}", other),
                }
            }
            other => panic!("expected qualified name, got {:?}", other),
        }
    }

    #[test]
    fn test_pop_qualified() {
        let (recv, last) = pop_qualified(build_qualified(name("a"), vec![name("b")]));
        assert_eq!(recv, Some(Expr::SimpleName(name("a"))));
        assert_eq!(last.identifier, "b");

        let (recv, last) = pop_qualified(Name::SimpleName(name("x")));
        assert_eq!(recv, None);
        assert_eq!(last.identifier, "x");
    }

    #[test]
    fn test_build_array_type_depth() {
        let ty = build_array_type(
            Ty::SimpleType(crate::ast::SimpleType {
                name: Name::SimpleName(name("String")),
                loc: Loc::default(),
            }),
            2,
            Loc::default(),
        );
        match ty {
            Ty::ArrayType(outer) => match *outer.component_type {
                Ty::ArrayType(inner) => {
                    assert!(matches!(*inner.component_type, Ty::SimpleType(_)));
                }
                other => panic!("expected nested array type, got {:?}", other),
            },
            other => panic!("expected array type, got {:?}", other),
        }
    }

    #[test]
    fn test_set_once_accepts_first_write() {
        let mut slot = None;
        set_once(&mut slot, "body", 42);
        assert_eq!(slot, Some(42));
    }

    #[test]
    #[should_panic(expected = "field `body` written twice")]
    fn test_set_once_rejects_second_write() {
        let mut slot = Some(1);
        set_once(&mut slot, "body", 2);
    }
}

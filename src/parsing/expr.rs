//! Expression grammar.
//!
//! Precedence is encoded purely by rule nesting: each infix level parses
//! the next-tighter level as its operand and folds left. Ordered choice
//! resolves the classic ambiguities — lambdas before parenthesized
//! expressions, primitive casts before reference casts, and a reference
//! cast commits only when a non-plus/minus operand follows, so `(a) - b`
//! stays a subtraction.

use crate::ast::{
    Annotation, ArrayAccess, ArrayCreation, ArrayInitializer, ArrayType, Assignment, AssignOp,
    BodyDecl, BooleanLiteral, CastExpression, CharacterLiteral, ClassInstanceCreation,
    ConditionalExpression, Expr, FieldAccess, InfixExpression, InfixOp, InstanceofExpression,
    LambdaBody, LambdaExpression, MethodInvocation, MethodReference, Name, NullLiteral,
    NumberLiteral, ParameterizedType, ParenthesizedExpression, PostfixExpression, PostfixOp,
    PrefixExpression, PrefixOp, SimpleName, SimpleType, SingleVariableDeclaration, StringLiteral,
    SuperFieldAccess, SuperMethodInvocation, ThisExpression, Ty, TypeLiteral,
};
use crate::builder::{build_infix_left, build_list, pop_qualified, span};
use crate::parsing::{alt, Fail, PResult, Parser};

/// Postfix step parsed before the receiver expression is known.
enum Suffix {
    Member {
        type_arguments: Vec<Ty>,
        name: SimpleName,
        arguments: Option<Vec<Expr>>,
    },
    InnerCreation {
        type_arguments: Vec<Ty>,
        instance_type: Ty,
        arguments: Vec<Expr>,
        anonymous_class_body: Option<Vec<BodyDecl>>,
    },
    Index(Expr),
    MethodRef {
        type_arguments: Vec<Ty>,
        name: Option<SimpleName>,
    },
    Update(PostfixOp),
}

fn has_type_arguments(ty: &Ty) -> bool {
    match ty {
        Ty::ParameterizedType(_) => true,
        Ty::QualifiedType(t) => has_type_arguments(&t.qualifier),
        _ => false,
    }
}

impl Parser {
    pub(crate) fn expression(&mut self) -> PResult<Expr> {
        alt!(self, Self::lambda, Self::assignment, Self::conditional)
    }

    fn assignment(&mut self) -> PResult<Expr> {
        let left = self.unary()?;
        let operator = self.assign_op()?;
        let right = self.expression()?;
        let loc = span(left.loc(), right.loc());
        Ok(Expr::Assignment(Assignment {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            loc,
        }))
    }

    fn assign_op(&mut self) -> PResult<AssignOp> {
        alt!(
            self,
            |p: &mut Self| p.sym(">>>=").map(|_| AssignOp::RightShiftUnsignedAssign),
            |p: &mut Self| p.sym(">>=").map(|_| AssignOp::RightShiftSignedAssign),
            |p: &mut Self| p.sym("<<=").map(|_| AssignOp::LeftShiftAssign),
            |p: &mut Self| p.sym("+=").map(|_| AssignOp::PlusAssign),
            |p: &mut Self| p.sym("-=").map(|_| AssignOp::MinusAssign),
            |p: &mut Self| p.sym("*=").map(|_| AssignOp::TimesAssign),
            |p: &mut Self| p.sym("/=").map(|_| AssignOp::DivideAssign),
            |p: &mut Self| p.sym("&=").map(|_| AssignOp::AndAssign),
            |p: &mut Self| p.sym("|=").map(|_| AssignOp::OrAssign),
            |p: &mut Self| p.sym("^=").map(|_| AssignOp::XorAssign),
            |p: &mut Self| p.sym("%=").map(|_| AssignOp::RemainderAssign),
            |p: &mut Self| p.sym_not("=", b"=").map(|_| AssignOp::Assign),
        )
    }

    fn conditional(&mut self) -> PResult<Expr> {
        let condition = self.conditional_or()?;
        let tail = self.opt(|p| {
            p.sym("?")?;
            let then_expression = p.expression()?;
            p.sym_not(":", b":")?;
            let else_expression = alt!(p, Self::lambda, Self::conditional)?;
            Ok((then_expression, else_expression))
        })?;
        match tail {
            Some((then_expression, else_expression)) => {
                let loc = span(condition.loc(), else_expression.loc());
                Ok(Expr::ConditionalExpression(ConditionalExpression {
                    condition: Box::new(condition),
                    then_expression: Box::new(then_expression),
                    else_expression: Box::new(else_expression),
                    loc,
                }))
            }
            None => Ok(condition),
        }
    }

    /// `operand (op operand)*` folded left; shared by every plain infix
    /// level.
    fn infix_level<F, G>(&mut self, mut operand: F, mut op: G) -> PResult<Expr>
    where
        F: FnMut(&mut Self) -> PResult<Expr>,
        G: FnMut(&mut Self) -> PResult<InfixOp>,
    {
        let first = operand(self)?;
        let rest = self.many(|p| {
            let operator = op(p)?;
            Ok((operator, operand(p)?))
        })?;
        Ok(build_infix_left(first, rest))
    }

    fn conditional_or(&mut self) -> PResult<Expr> {
        self.infix_level(Self::conditional_and, |p| {
            p.sym("||").map(|_| InfixOp::ConditionalOr)
        })
    }

    fn conditional_and(&mut self) -> PResult<Expr> {
        self.infix_level(Self::inclusive_or, |p| {
            p.sym("&&").map(|_| InfixOp::ConditionalAnd)
        })
    }

    fn inclusive_or(&mut self) -> PResult<Expr> {
        self.infix_level(Self::exclusive_or, |p| {
            p.sym_not("|", b"|=").map(|_| InfixOp::Or)
        })
    }

    fn exclusive_or(&mut self) -> PResult<Expr> {
        self.infix_level(Self::bitwise_and, |p| {
            p.sym_not("^", b"=").map(|_| InfixOp::Xor)
        })
    }

    fn bitwise_and(&mut self) -> PResult<Expr> {
        self.infix_level(Self::equality, |p| {
            p.sym_not("&", b"&=").map(|_| InfixOp::And)
        })
    }

    fn equality(&mut self) -> PResult<Expr> {
        self.infix_level(Self::relational, |p| {
            alt!(
                p,
                |p: &mut Self| p.sym("==").map(|_| InfixOp::Equals),
                |p: &mut Self| p.sym("!=").map(|_| InfixOp::NotEquals),
            )
        })
    }

    /// Comparison operators and `instanceof` share a level, folding left
    /// over the same growing operand.
    fn relational(&mut self) -> PResult<Expr> {
        let mut expr = self.shift()?;
        loop {
            if let Some(ty) = self.opt(|p| {
                p.word("instanceof")?;
                p.ty()
            })? {
                let loc = span(expr.loc(), ty.loc());
                expr = Expr::InstanceofExpression(InstanceofExpression {
                    left_operand: Box::new(expr),
                    right_operand: ty,
                    loc,
                });
                continue;
            }
            let step = self.opt(|p| {
                let operator = alt!(
                    p,
                    |p: &mut Self| p.sym("<=").map(|_| InfixOp::LessEquals),
                    |p: &mut Self| p.sym(">=").map(|_| InfixOp::GreaterEquals),
                    |p: &mut Self| p.sym_not("<", b"<=").map(|_| InfixOp::Less),
                    |p: &mut Self| p.sym_not(">", b">=").map(|_| InfixOp::Greater),
                )?;
                Ok((operator, p.shift()?))
            })?;
            match step {
                Some((operator, right)) => {
                    let loc = span(expr.loc(), right.loc());
                    expr = Expr::InfixExpression(InfixExpression {
                        operator,
                        left_operand: Box::new(expr),
                        right_operand: Box::new(right),
                        loc,
                    });
                }
                None => return Ok(expr),
            }
        }
    }

    fn shift(&mut self) -> PResult<Expr> {
        self.infix_level(Self::additive, |p| {
            alt!(
                p,
                |p: &mut Self| p.sym_not(">>>", b"=").map(|_| InfixOp::RightShiftUnsigned),
                |p: &mut Self| p.sym_not(">>", b">=").map(|_| InfixOp::RightShiftSigned),
                |p: &mut Self| p.sym_not("<<", b"=").map(|_| InfixOp::LeftShift),
            )
        })
    }

    fn additive(&mut self) -> PResult<Expr> {
        self.infix_level(Self::multiplicative, |p| {
            alt!(
                p,
                |p: &mut Self| p.sym_not("+", b"+=").map(|_| InfixOp::Plus),
                |p: &mut Self| p.sym_not("-", b"-=").map(|_| InfixOp::Minus),
            )
        })
    }

    fn multiplicative(&mut self) -> PResult<Expr> {
        self.infix_level(Self::unary, |p| {
            alt!(
                p,
                |p: &mut Self| p.sym_not("*", b"=").map(|_| InfixOp::Times),
                // `/` must not eat the head of a comment.
                |p: &mut Self| p.sym_not("/", b"=/*").map(|_| InfixOp::Divide),
                |p: &mut Self| p.sym_not("%", b"=").map(|_| InfixOp::Remainder),
            )
        })
    }

    fn prefix(&mut self, operator: PrefixOp, token: &str, excl: &[u8]) -> PResult<Expr> {
        let start = self.pos;
        if excl.is_empty() {
            self.sym(token)?;
        } else {
            self.sym_not(token, excl)?;
        }
        let operand = self.unary()?;
        let loc = span(self.loc_here(start), operand.loc());
        Ok(Expr::PrefixExpression(PrefixExpression {
            operator,
            operand: Box::new(operand),
            loc,
        }))
    }

    fn unary(&mut self) -> PResult<Expr> {
        alt!(
            self,
            |p: &mut Self| p.prefix(PrefixOp::Increment, "++", b""),
            |p: &mut Self| p.prefix(PrefixOp::Decrement, "--", b""),
            |p: &mut Self| p.prefix(PrefixOp::Plus, "+", b"+="),
            |p: &mut Self| p.prefix(PrefixOp::Minus, "-", b"-="),
            Self::unary_not_plus_minus,
        )
    }

    fn unary_not_plus_minus(&mut self) -> PResult<Expr> {
        alt!(
            self,
            |p: &mut Self| p.prefix(PrefixOp::Complement, "~", b""),
            |p: &mut Self| p.prefix(PrefixOp::Not, "!", b"="),
            Self::cast,
            Self::postfix_chain,
        )
    }

    fn cast(&mut self) -> PResult<Expr> {
        alt!(
            self,
            |p: &mut Self| {
                let start = p.pos;
                p.sym("(")?;
                let cast_type = p.primitive_type()?;
                p.sym(")")?;
                let expression = p.unary()?;
                let loc = span(p.loc_here(start), expression.loc());
                Ok(Expr::CastExpression(CastExpression {
                    cast_type,
                    expression: Box::new(expression),
                    loc,
                }))
            },
            |p: &mut Self| {
                let start = p.pos;
                p.sym("(")?;
                let cast_type = p.ty()?;
                p.sym(")")?;
                let expression = alt!(p, Self::lambda, Self::unary_not_plus_minus)?;
                let loc = span(p.loc_here(start), expression.loc());
                Ok(Expr::CastExpression(CastExpression {
                    cast_type,
                    expression: Box::new(expression),
                    loc,
                }))
            },
        )
    }

    fn postfix_chain(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let mut expr = self.primary()?;
        loop {
            let suffix = match self.attempt(Self::suffix) {
                Ok(suffix) => suffix,
                Err(fail) if self.halted() => return Err(fail),
                Err(_) => return Ok(expr),
            };
            let loc = self.loc_from(start);
            expr = match suffix {
                Suffix::Member {
                    type_arguments,
                    name,
                    arguments: Some(arguments),
                } => Expr::MethodInvocation(MethodInvocation {
                    expression: Some(Box::new(expr)),
                    type_arguments,
                    name,
                    arguments,
                    loc,
                }),
                Suffix::Member { name, .. } => Expr::FieldAccess(FieldAccess {
                    expression: Box::new(expr),
                    name,
                    loc,
                }),
                Suffix::InnerCreation {
                    type_arguments,
                    instance_type,
                    arguments,
                    anonymous_class_body,
                } => Expr::ClassInstanceCreation(ClassInstanceCreation {
                    expression: Some(Box::new(expr)),
                    type_arguments,
                    instance_type,
                    arguments,
                    anonymous_class_body,
                    loc,
                }),
                Suffix::Index(index) => Expr::ArrayAccess(ArrayAccess {
                    array: Box::new(expr),
                    index: Box::new(index),
                    loc,
                }),
                Suffix::MethodRef {
                    type_arguments,
                    name,
                } => Expr::MethodReference(MethodReference {
                    expression: Box::new(expr),
                    type_arguments,
                    name,
                    loc,
                }),
                Suffix::Update(operator) => Expr::PostfixExpression(PostfixExpression {
                    operand: Box::new(expr),
                    operator,
                    loc,
                }),
            };
        }
    }

    fn suffix(&mut self) -> PResult<Suffix> {
        alt!(
            self,
            |p: &mut Self| {
                p.sym(".")?;
                p.word("new")?;
                let type_arguments = p.opt(Self::type_arguments)?.unwrap_or_default();
                let instance_type = p.inner_creation_type()?;
                let arguments = p.arguments()?;
                let anonymous_class_body = p.opt(|p| {
                    let body = p.class_body()?;
                    p.spacing()?;
                    Ok(body)
                })?;
                Ok(Suffix::InnerCreation {
                    type_arguments,
                    instance_type,
                    arguments,
                    anonymous_class_body,
                })
            },
            |p: &mut Self| {
                p.sym(".")?;
                let type_arguments = p.type_arguments()?;
                let name = p.ident()?;
                let arguments = p.arguments()?;
                Ok(Suffix::Member {
                    type_arguments,
                    name,
                    arguments: Some(arguments),
                })
            },
            |p: &mut Self| {
                p.sym(".")?;
                let name = p.ident()?;
                let arguments = p.opt(Self::arguments)?;
                Ok(Suffix::Member {
                    type_arguments: Vec::new(),
                    name,
                    arguments,
                })
            },
            |p: &mut Self| {
                p.sym("[")?;
                let index = p.expression()?;
                p.sym("]")?;
                Ok(Suffix::Index(index))
            },
            |p: &mut Self| {
                p.sym("::")?;
                let type_arguments = p.opt(Self::type_arguments)?.unwrap_or_default();
                let name = alt!(
                    p,
                    |p: &mut Self| p.ident().map(Some),
                    |p: &mut Self| p.word("new").map(|_| None),
                )?;
                Ok(Suffix::MethodRef {
                    type_arguments,
                    name,
                })
            },
            |p: &mut Self| p.sym("++").map(|_| Suffix::Update(PostfixOp::Increment)),
            |p: &mut Self| p.sym("--").map(|_| Suffix::Update(PostfixOp::Decrement)),
        )
    }

    /// Single, optionally parameterized segment of `outer.new Inner<T>()`.
    fn inner_creation_type(&mut self) -> PResult<Ty> {
        let start = self.pos;
        let name = self.ident()?;
        let loc = self.loc_from(start);
        let mut ty = Ty::SimpleType(SimpleType {
            name: Name::SimpleName(name),
            loc,
        });
        if let Some(args) = self.opt(Self::type_arguments)? {
            ty = Ty::ParameterizedType(ParameterizedType {
                base: Box::new(ty),
                type_arguments: args,
                loc: self.loc_from(start),
            });
        }
        Ok(ty)
    }

    fn primary(&mut self) -> PResult<Expr> {
        alt!(
            self,
            |p: &mut Self| {
                let start = p.pos;
                p.sym("(")?;
                let expression = p.expression()?;
                p.sym(")")?;
                Ok(Expr::ParenthesizedExpression(ParenthesizedExpression {
                    expression: Box::new(expression),
                    loc: p.loc_from(start),
                }))
            },
            Self::literal_expr,
            Self::this_expression,
            Self::super_access,
            Self::creation,
            Self::type_literal,
            Self::parameterized_method_reference,
            Self::name_or_invocation,
        )
    }

    fn literal_expr(&mut self) -> PResult<Expr> {
        alt!(
            self,
            |p: &mut Self| {
                let (token, loc) = p.number_token()?;
                Ok(Expr::NumberLiteral(NumberLiteral { token, loc }))
            },
            |p: &mut Self| {
                let (escaped_value, loc) = p.char_token()?;
                Ok(Expr::CharacterLiteral(CharacterLiteral {
                    escaped_value,
                    loc,
                }))
            },
            |p: &mut Self| {
                let (escaped_value, loc) = p.string_token()?;
                Ok(Expr::StringLiteral(StringLiteral { escaped_value, loc }))
            },
            |p: &mut Self| {
                let start = p.pos;
                p.word("true")?;
                Ok(Expr::BooleanLiteral(BooleanLiteral {
                    value: true,
                    loc: p.loc_from(start),
                }))
            },
            |p: &mut Self| {
                let start = p.pos;
                p.word("false")?;
                Ok(Expr::BooleanLiteral(BooleanLiteral {
                    value: false,
                    loc: p.loc_from(start),
                }))
            },
            |p: &mut Self| {
                let start = p.pos;
                p.word("null")?;
                Ok(Expr::NullLiteral(NullLiteral {
                    loc: p.loc_from(start),
                }))
            },
        )
    }

    fn this_expression(&mut self) -> PResult<Expr> {
        alt!(
            self,
            |p: &mut Self| {
                let start = p.pos;
                let qualifier = p.qualified_name()?;
                p.sym(".")?;
                p.word("this")?;
                Ok(Expr::ThisExpression(ThisExpression {
                    qualifier: Some(qualifier),
                    loc: p.loc_from(start),
                }))
            },
            |p: &mut Self| {
                let start = p.pos;
                p.word("this")?;
                Ok(Expr::ThisExpression(ThisExpression {
                    qualifier: None,
                    loc: p.loc_from(start),
                }))
            },
        )
    }

    fn super_access(&mut self) -> PResult<Expr> {
        let start = self.pos;
        self.word("super")?;
        self.sym(".")?;
        if let Some(type_arguments) = self.opt(Self::type_arguments)? {
            let name = self.ident()?;
            let arguments = self.arguments()?;
            return Ok(Expr::SuperMethodInvocation(SuperMethodInvocation {
                type_arguments,
                name,
                arguments,
                loc: self.loc_from(start),
            }));
        }
        let name = self.ident()?;
        match self.opt(Self::arguments)? {
            Some(arguments) => Ok(Expr::SuperMethodInvocation(SuperMethodInvocation {
                type_arguments: Vec::new(),
                name,
                arguments,
                loc: self.loc_from(start),
            })),
            None => Ok(Expr::SuperFieldAccess(SuperFieldAccess {
                name,
                loc: self.loc_from(start),
            })),
        }
    }

    fn creation(&mut self) -> PResult<Expr> {
        let start = self.pos;
        self.word("new")?;
        let type_arguments = self.opt(Self::type_arguments)?.unwrap_or_default();
        // An array creation is committed to by the `[` after the base
        // type; everything else is a class instance creation.
        let array_base = self.attempt(|p| {
            let base = alt!(p, Self::primitive_type, Self::class_or_interface_type)?;
            p.peek(|p| p.sym("["))?;
            Ok(base)
        });
        match array_base {
            Ok(base) => self.array_creation_rest(base, start),
            Err(fail) if self.halted() => Err(fail),
            Err(_) => {
                let instance_type = self.class_or_interface_type()?;
                let arguments = self.arguments()?;
                let anonymous_class_body = self.opt(|p| {
                    let body = p.class_body()?;
                    p.spacing()?;
                    Ok(body)
                })?;
                Ok(Expr::ClassInstanceCreation(ClassInstanceCreation {
                    expression: None,
                    type_arguments,
                    instance_type,
                    arguments,
                    anonymous_class_body,
                    loc: self.loc_from(start),
                }))
            }
        }
    }

    /// `new T[e]...[]...` with sized dimensions, or `new T[]... { ... }`
    /// with an initializer.
    fn array_creation_rest(&mut self, base: Ty, start: usize) -> PResult<Expr> {
        let dimension_expressions = self.many(|p| {
            p.sym("[")?;
            let e = p.expression()?;
            p.sym("]")?;
            Ok(e)
        })?;
        let (total_dims, initializer) = if dimension_expressions.is_empty() {
            let dims = self.many1(|p| {
                p.sym("[")?;
                p.sym("]")
            })?;
            (dims.len(), Some(self.array_initializer()?))
        } else {
            let extra = self.dims()?;
            (dimension_expressions.len() + extra as usize, None)
        };
        let loc = self.loc_from(start);
        let mut component = base;
        for _ in 1..total_dims {
            component = Ty::ArrayType(ArrayType {
                component_type: Box::new(component),
                loc,
            });
        }
        Ok(Expr::ArrayCreation(ArrayCreation {
            array_type: ArrayType {
                component_type: Box::new(component),
                loc,
            },
            dimension_expressions,
            initializer,
            loc,
        }))
    }

    pub(crate) fn array_initializer(&mut self) -> PResult<ArrayInitializer> {
        let start = self.pos;
        self.sym("{")?;
        let expressions = match self.opt(|p| {
            let first = p.variable_initializer()?;
            let rest = p.many(|p| {
                p.sym(",")?;
                p.variable_initializer()
            })?;
            Ok(build_list(first, rest))
        })? {
            Some(expressions) => expressions,
            None => Vec::new(),
        };
        let _ = self.opt(|p| p.sym(","))?;
        self.sym("}")?;
        Ok(ArrayInitializer {
            expressions,
            loc: self.loc_from(start),
        })
    }

    /// Initializer position admits a bare brace initializer in addition
    /// to any expression.
    pub(crate) fn variable_initializer(&mut self) -> PResult<Expr> {
        alt!(
            self,
            |p: &mut Self| p.array_initializer().map(Expr::ArrayInitializer),
            Self::expression,
        )
    }

    fn type_literal(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let literal_type = self.ty_or_void()?;
        self.sym(".")?;
        self.word("class")?;
        Ok(Expr::TypeLiteral(TypeLiteral {
            literal_type,
            loc: self.loc_from(start),
        }))
    }

    /// `List<String>::new` and friends: recognized, not built.
    fn parameterized_method_reference(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let ty = self.class_or_interface_type()?;
        if !has_type_arguments(&ty) {
            return Err(Fail);
        }
        self.peek(|p| p.literal("::"))?;
        Err(self.unsupported("method reference on a parameterized type", start))
    }

    fn name_or_invocation(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let name = self.qualified_name()?;
        match self.opt(Self::arguments)? {
            Some(arguments) => {
                let (expression, name) = pop_qualified(name);
                Ok(Expr::MethodInvocation(MethodInvocation {
                    expression: expression.map(Box::new),
                    type_arguments: Vec::new(),
                    name,
                    arguments,
                    loc: self.loc_from(start),
                }))
            }
            None => Ok(Expr::from(name)),
        }
    }

    pub(crate) fn arguments(&mut self) -> PResult<Vec<Expr>> {
        self.sym("(")?;
        let arguments = match self.opt(|p| {
            let first = p.expression()?;
            let rest = p.many(|p| {
                p.sym(",")?;
                p.expression()
            })?;
            Ok(build_list(first, rest))
        })? {
            Some(arguments) => arguments,
            None => Vec::new(),
        };
        self.sym(")")?;
        Ok(arguments)
    }

    fn lambda(&mut self) -> PResult<Expr> {
        let start = self.pos;
        let parameters = self.lambda_parameters()?;
        self.sym("->")?;
        let body = alt!(
            self,
            |p: &mut Self| {
                let block = p.block()?;
                p.spacing()?;
                Ok(LambdaBody::Block(block))
            },
            |p: &mut Self| Ok(LambdaBody::Expression(Box::new(p.expression()?))),
        )?;
        Ok(Expr::LambdaExpression(LambdaExpression {
            parameters,
            body,
            loc: self.loc_from(start),
        }))
    }

    fn lambda_parameters(&mut self) -> PResult<Vec<SingleVariableDeclaration>> {
        alt!(
            self,
            |p: &mut Self| p.inferred_parameter().map(|param| vec![param]),
            |p: &mut Self| {
                p.sym("(")?;
                p.sym(")")?;
                Ok(Vec::new())
            },
            |p: &mut Self| {
                p.sym("(")?;
                let first = p.lambda_parameter()?;
                let rest = p.many(|p| {
                    p.sym(",")?;
                    p.lambda_parameter()
                })?;
                p.sym(")")?;
                Ok(build_list(first, rest))
            },
        )
    }

    fn lambda_parameter(&mut self) -> PResult<SingleVariableDeclaration> {
        alt!(self, Self::formal_parameter, Self::inferred_parameter)
    }

    fn inferred_parameter(&mut self) -> PResult<SingleVariableDeclaration> {
        let name = self.ident()?;
        let loc = name.loc;
        Ok(SingleVariableDeclaration {
            modifiers: Vec::new(),
            parameter_type: None,
            varargs: false,
            name,
            extra_dimensions: 0,
            loc,
        })
    }

    /// Annotation in element-value position, e.g. inside another
    /// annotation's member values.
    pub(crate) fn annotation_value(&mut self) -> PResult<Expr> {
        alt!(
            self,
            |p: &mut Self| {
                let annotation: Annotation = p.annotation()?;
                Ok(Expr::Annotation(Box::new(annotation)))
            },
            |p: &mut Self| p.array_initializer().map(Expr::ArrayInitializer),
            Self::expression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_expression;

    fn parse(source: &str) -> Expr {
        parse_expression(source.as_bytes()).unwrap()
    }

    fn num(e: &Expr) -> &str {
        match e {
            Expr::NumberLiteral(n) => &n.token,
            other => panic!("expected number literal, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        match parse("1 + 2 * 3") {
            Expr::InfixExpression(e) => {
                assert_eq!(e.operator, InfixOp::Plus);
                assert_eq!(num(&e.left_operand), "1");
                match *e.right_operand {
                    Expr::InfixExpression(inner) => {
                        assert_eq!(inner.operator, InfixOp::Times);
                        assert_eq!(num(&inner.left_operand), "2");
                        assert_eq!(num(&inner.right_operand), "3");
                    }
                    other => panic!("expected nested infix, got {:?}", other),
                }
            }
            other => panic!("expected infix, got {:?}", other),
        }
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        match parse("a - b - c") {
            Expr::InfixExpression(e) => {
                assert!(matches!(*e.left_operand, Expr::InfixExpression(_)));
                assert!(matches!(*e.right_operand, Expr::SimpleName(_)));
            }
            other => panic!("expected infix, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match parse("a = b = c") {
            Expr::Assignment(e) => {
                assert!(matches!(*e.left, Expr::SimpleName(_)));
                assert!(matches!(*e.right, Expr::Assignment(_)));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_minus_is_subtraction_not_cast() {
        match parse("(a) - b") {
            Expr::InfixExpression(e) => {
                assert_eq!(e.operator, InfixOp::Minus);
                assert!(matches!(*e.left_operand, Expr::ParenthesizedExpression(_)));
            }
            other => panic!("expected infix, got {:?}", other),
        }
    }

    #[test]
    fn test_primitive_cast_takes_signed_operand() {
        match parse("(int) - b") {
            Expr::CastExpression(e) => {
                assert!(matches!(*e.expression, Expr::PrefixExpression(_)));
            }
            other => panic!("expected cast, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_cast() {
        match parse("(List<String>) x") {
            Expr::CastExpression(e) => {
                assert!(matches!(e.cast_type, Ty::ParameterizedType(_)));
            }
            other => panic!("expected cast, got {:?}", other),
        }
    }

    #[test]
    fn test_dotted_invocation_splits_receiver() {
        match parse("a.b.f(x)") {
            Expr::MethodInvocation(e) => {
                assert_eq!(e.name.identifier, "f");
                assert!(matches!(
                    e.expression.as_deref(),
                    Some(Expr::QualifiedName(_))
                ));
                assert_eq!(e.arguments.len(), 1);
            }
            other => panic!("expected invocation, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_calls_and_index() {
        match parse("a.f().g()[0]") {
            Expr::ArrayAccess(e) => {
                assert!(matches!(*e.array, Expr::MethodInvocation(_)));
            }
            other => panic!("expected array access, got {:?}", other),
        }
    }

    #[test]
    fn test_conditional_nests_rightward() {
        match parse("a ? b : c ? d : e") {
            Expr::ConditionalExpression(e) => {
                assert!(matches!(*e.else_expression, Expr::ConditionalExpression(_)));
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_instanceof() {
        match parse("x instanceof String") {
            Expr::InstanceofExpression(e) => {
                assert!(matches!(e.right_operand, Ty::SimpleType(_)));
            }
            other => panic!("expected instanceof, got {:?}", other),
        }
    }

    #[test]
    fn test_shift_does_not_eat_generic_closers() {
        match parse("a >> 2") {
            Expr::InfixExpression(e) => assert_eq!(e.operator, InfixOp::RightShiftSigned),
            other => panic!("expected infix, got {:?}", other),
        }
        match parse("a >>> 2") {
            Expr::InfixExpression(e) => assert_eq!(e.operator, InfixOp::RightShiftUnsigned),
            other => panic!("expected infix, got {:?}", other),
        }
    }

    #[test]
    fn test_postfix_and_prefix_updates() {
        assert!(matches!(parse("i++"), Expr::PostfixExpression(_)));
        assert!(matches!(parse("--i"), Expr::PrefixExpression(_)));
        // Maximal munch: `a+++b` is `(a++) + b`.
        match parse("a+++b") {
            Expr::InfixExpression(e) => {
                assert!(matches!(*e.left_operand, Expr::PostfixExpression(_)));
            }
            other => panic!("expected infix, got {:?}", other),
        }
    }

    #[test]
    fn test_array_creation_forms() {
        match parse("new int[2][3]") {
            Expr::ArrayCreation(e) => {
                assert_eq!(e.dimension_expressions.len(), 2);
                assert!(e.initializer.is_none());
            }
            other => panic!("expected array creation, got {:?}", other),
        }
        match parse("new int[] {1, 2, 3}") {
            Expr::ArrayCreation(e) => {
                assert!(e.dimension_expressions.is_empty());
                assert_eq!(e.initializer.unwrap().expressions.len(), 3);
            }
            other => panic!("expected array creation, got {:?}", other),
        }
    }

    #[test]
    fn test_class_instance_creation() {
        match parse("new java.util.ArrayList<String>(10)") {
            Expr::ClassInstanceCreation(e) => {
                assert!(matches!(e.instance_type, Ty::ParameterizedType(_)));
                assert_eq!(e.arguments.len(), 1);
                assert!(e.anonymous_class_body.is_none());
            }
            other => panic!("expected creation, got {:?}", other),
        }
    }

    #[test]
    fn test_lambda_forms() {
        match parse("x -> x") {
            Expr::LambdaExpression(e) => {
                assert_eq!(e.parameters.len(), 1);
                assert!(e.parameters[0].parameter_type.is_none());
                assert!(matches!(e.body, LambdaBody::Expression(_)));
            }
            other => panic!("expected lambda, got {:?}", other),
        }
        match parse("(int a, int b) -> { return a; }") {
            Expr::LambdaExpression(e) => {
                assert_eq!(e.parameters.len(), 2);
                assert!(e.parameters[0].parameter_type.is_some());
                assert!(matches!(e.body, LambdaBody::Block(_)));
            }
            other => panic!("expected lambda, got {:?}", other),
        }
        assert!(matches!(parse("() -> 1"), Expr::LambdaExpression(_)));
    }

    #[test]
    fn test_method_reference() {
        match parse("String::valueOf") {
            Expr::MethodReference(e) => {
                assert_eq!(e.name.unwrap().identifier, "valueOf");
            }
            other => panic!("expected method reference, got {:?}", other),
        }
        match parse("ArrayList::new") {
            Expr::MethodReference(e) => assert!(e.name.is_none()),
            other => panic!("expected method reference, got {:?}", other),
        }
    }

    #[test]
    fn test_parameterized_method_reference_is_unsupported() {
        let err = parse_expression(b"ArrayList<String>::new").unwrap_err();
        match err {
            crate::parser_diagnostics::ParseError::Unsupported(e) => {
                assert!(e.construct.contains("parameterized"));
            }
            other => panic!("expected unsupported-construct error, got {:?}", other),
        }
    }

    #[test]
    fn test_type_literal_and_qualified_this() {
        assert!(matches!(parse("String.class"), Expr::TypeLiteral(_)));
        assert!(matches!(parse("int.class"), Expr::TypeLiteral(_)));
        match parse("Outer.this") {
            Expr::ThisExpression(e) => assert!(e.qualifier.is_some()),
            other => panic!("expected this-expression, got {:?}", other),
        }
    }

    #[test]
    fn test_super_access_forms() {
        assert!(matches!(parse("super.x"), Expr::SuperFieldAccess(_)));
        match parse("super.f(1)") {
            Expr::SuperMethodInvocation(e) => assert_eq!(e.arguments.len(), 1),
            other => panic!("expected super invocation, got {:?}", other),
        }
    }

    #[test]
    fn test_division_does_not_eat_comment() {
        assert!(matches!(parse("a / b"), Expr::InfixExpression(_)));
        // `//` starts a comment, not a division by a division.
        match parse("a // b") {
            Expr::SimpleName(n) => assert_eq!(n.identifier, "a"),
            other => panic!("expected bare name, got {:?}", other),
        }
    }

    #[test]
    fn test_inner_class_creation() {
        match parse("outer.new Inner(1)") {
            Expr::ClassInstanceCreation(e) => {
                assert!(e.expression.is_some());
                assert_eq!(e.arguments.len(), 1);
            }
            other => panic!("expected inner creation, got {:?}", other),
        }
    }
}

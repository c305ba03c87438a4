//! Syntax tree produced by the parser.
//!
//! Nodes are grouped into closed categories (declarations, statements,
//! expressions, types, annotations) so consumers can match exhaustively.
//! List-valued fields preserve source order and are empty rather than
//! absent; optional scalar fields are `Option`. Every node carries a
//! [`Loc`] with 1-based line/column endpoints.

use bitflags::bitflags;
use derive_more::From;
use serde::Serialize;

/// A point in the source text. `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

/// Source extent of a node, from the first byte of its first token to
/// just past the last byte of its last token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Loc {
    pub start: Pos,
    pub end: Pos,
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleName {
    pub identifier: String,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifiedName {
    pub qualifier: Box<Name>,
    pub name: SimpleName,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum Name {
    SimpleName(SimpleName),
    QualifiedName(QualifiedName),
}

impl Name {
    pub fn loc(&self) -> Loc {
        match self {
            Name::SimpleName(n) => n.loc,
            Name::QualifiedName(n) => n.loc,
        }
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Void,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Void => "void",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveType {
    pub primitive_type_code: PrimitiveKind,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleType {
    pub name: Name,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterizedType {
    pub base: Box<Ty>,
    pub type_arguments: Vec<Ty>,
    pub loc: Loc,
}

/// `Outer<String>.Inner` — a name qualified by another type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifiedType {
    pub qualifier: Box<Ty>,
    pub name: SimpleName,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayType {
    pub component_type: Box<Ty>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WildcardType {
    pub bound: Option<Box<Ty>>,
    /// `true` for `? extends T`, `false` for `? super T`; meaningless
    /// when `bound` is `None`.
    pub upper_bound: bool,
    pub loc: Loc,
}

/// Multi-catch alternatives, `A | B | C`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionType {
    pub types: Vec<Ty>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum Ty {
    PrimitiveType(PrimitiveType),
    SimpleType(SimpleType),
    ParameterizedType(ParameterizedType),
    QualifiedType(QualifiedType),
    ArrayType(ArrayType),
    WildcardType(WildcardType),
    UnionType(UnionType),
}

impl Ty {
    pub fn loc(&self) -> Loc {
        match self {
            Ty::PrimitiveType(t) => t.loc,
            Ty::SimpleType(t) => t.loc,
            Ty::ParameterizedType(t) => t.loc,
            Ty::QualifiedType(t) => t.loc,
            Ty::ArrayType(t) => t.loc,
            Ty::WildcardType(t) => t.loc,
            Ty::UnionType(t) => t.loc,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(
            self,
            Ty::PrimitiveType(PrimitiveType {
                primitive_type_code: PrimitiveKind::Void,
                ..
            })
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParameter {
    pub name: SimpleName,
    pub type_bounds: Vec<Ty>,
    pub loc: Loc,
}

// ---------------------------------------------------------------------------
// Modifiers and annotations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKeyword {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
}

impl ModifierKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            ModifierKeyword::Public => "public",
            ModifierKeyword::Protected => "protected",
            ModifierKeyword::Private => "private",
            ModifierKeyword::Static => "static",
            ModifierKeyword::Abstract => "abstract",
            ModifierKeyword::Final => "final",
            ModifierKeyword::Native => "native",
            ModifierKeyword::Synchronized => "synchronized",
            ModifierKeyword::Transient => "transient",
            ModifierKeyword::Volatile => "volatile",
            ModifierKeyword::Strictfp => "strictfp",
            ModifierKeyword::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modifier {
    pub keyword: ModifierKeyword,
    pub loc: Loc,
}

bitflags! {
    /// Convenience mask over an ordered modifier list; the tree itself
    /// keeps the [`Modifier`] nodes in source order.
    pub struct ModifierFlags: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const ABSTRACT = 1 << 4;
        const FINAL = 1 << 5;
        const NATIVE = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const STRICTFP = 1 << 10;
        const DEFAULT = 1 << 11;
    }
}

impl ModifierFlags {
    pub fn of(modifiers: &[ExtendedModifier]) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        for m in modifiers {
            if let ExtendedModifier::Modifier(m) = m {
                flags |= match m.keyword {
                    ModifierKeyword::Public => ModifierFlags::PUBLIC,
                    ModifierKeyword::Protected => ModifierFlags::PROTECTED,
                    ModifierKeyword::Private => ModifierFlags::PRIVATE,
                    ModifierKeyword::Static => ModifierFlags::STATIC,
                    ModifierKeyword::Abstract => ModifierFlags::ABSTRACT,
                    ModifierKeyword::Final => ModifierFlags::FINAL,
                    ModifierKeyword::Native => ModifierFlags::NATIVE,
                    ModifierKeyword::Synchronized => ModifierFlags::SYNCHRONIZED,
                    ModifierKeyword::Transient => ModifierFlags::TRANSIENT,
                    ModifierKeyword::Volatile => ModifierFlags::VOLATILE,
                    ModifierKeyword::Strictfp => ModifierFlags::STRICTFP,
                    ModifierKeyword::Default => ModifierFlags::DEFAULT,
                };
            }
        }
        flags
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerAnnotation {
    pub type_name: Name,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleMemberAnnotation {
    pub type_name: Name,
    pub value: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberValuePair {
    pub name: SimpleName,
    pub value: Expr,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalAnnotation {
    pub type_name: Name,
    pub values: Vec<MemberValuePair>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum Annotation {
    MarkerAnnotation(MarkerAnnotation),
    SingleMemberAnnotation(SingleMemberAnnotation),
    NormalAnnotation(NormalAnnotation),
}

impl Annotation {
    pub fn loc(&self) -> Loc {
        match self {
            Annotation::MarkerAnnotation(a) => a.loc,
            Annotation::SingleMemberAnnotation(a) => a.loc,
            Annotation::NormalAnnotation(a) => a.loc,
        }
    }
}

/// Modifier-list element: keyword modifiers and annotations interleave
/// freely, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum ExtendedModifier {
    Modifier(Modifier),
    Annotation(Annotation),
}

// ---------------------------------------------------------------------------
// Comments and blank lines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndOfLineComment {
    pub comment: String,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraditionalComment {
    pub comment: String,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JavaDocComment {
    pub comment: String,
    pub loc: Loc,
}

/// A source line containing nothing but horizontal whitespace, kept so
/// consumers can reproduce the vertical shape of the original text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineEmpty {
    pub loc: Loc,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    PlusAssign,
    #[serde(rename = "-=")]
    MinusAssign,
    #[serde(rename = "*=")]
    TimesAssign,
    #[serde(rename = "/=")]
    DivideAssign,
    #[serde(rename = "&=")]
    AndAssign,
    #[serde(rename = "|=")]
    OrAssign,
    #[serde(rename = "^=")]
    XorAssign,
    #[serde(rename = "%=")]
    RemainderAssign,
    #[serde(rename = "<<=")]
    LeftShiftAssign,
    #[serde(rename = ">>=")]
    RightShiftSignedAssign,
    #[serde(rename = ">>>=")]
    RightShiftUnsignedAssign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::PlusAssign => "+=",
            AssignOp::MinusAssign => "-=",
            AssignOp::TimesAssign => "*=",
            AssignOp::DivideAssign => "/=",
            AssignOp::AndAssign => "&=",
            AssignOp::OrAssign => "|=",
            AssignOp::XorAssign => "^=",
            AssignOp::RemainderAssign => "%=",
            AssignOp::LeftShiftAssign => "<<=",
            AssignOp::RightShiftSignedAssign => ">>=",
            AssignOp::RightShiftUnsignedAssign => ">>>=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOp {
    #[serde(rename = "||")]
    ConditionalOr,
    #[serde(rename = "&&")]
    ConditionalAnd,
    #[serde(rename = "|")]
    Or,
    #[serde(rename = "^")]
    Xor,
    #[serde(rename = "&")]
    And,
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessEquals,
    #[serde(rename = ">=")]
    GreaterEquals,
    #[serde(rename = "<<")]
    LeftShift,
    #[serde(rename = ">>")]
    RightShiftSigned,
    #[serde(rename = ">>>")]
    RightShiftUnsigned,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "*")]
    Times,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Remainder,
}

impl InfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::ConditionalOr => "||",
            InfixOp::ConditionalAnd => "&&",
            InfixOp::Or => "|",
            InfixOp::Xor => "^",
            InfixOp::And => "&",
            InfixOp::Equals => "==",
            InfixOp::NotEquals => "!=",
            InfixOp::Less => "<",
            InfixOp::Greater => ">",
            InfixOp::LessEquals => "<=",
            InfixOp::GreaterEquals => ">=",
            InfixOp::LeftShift => "<<",
            InfixOp::RightShiftSigned => ">>",
            InfixOp::RightShiftUnsigned => ">>>",
            InfixOp::Plus => "+",
            InfixOp::Minus => "-",
            InfixOp::Times => "*",
            InfixOp::Divide => "/",
            InfixOp::Remainder => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOp {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "~")]
    Complement,
    #[serde(rename = "!")]
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostfixOp {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub left: Box<Expr>,
    pub operator: AssignOp,
    pub right: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalExpression {
    pub condition: Box<Expr>,
    pub then_expression: Box<Expr>,
    pub else_expression: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfixExpression {
    pub operator: InfixOp,
    pub left_operand: Box<Expr>,
    pub right_operand: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceofExpression {
    pub left_operand: Box<Expr>,
    pub right_operand: Ty,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefixExpression {
    pub operator: PrefixOp,
    pub operand: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostfixExpression {
    pub operand: Box<Expr>,
    pub operator: PostfixOp,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastExpression {
    pub cast_type: Ty,
    pub expression: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodInvocation {
    pub expression: Option<Box<Expr>>,
    pub type_arguments: Vec<Ty>,
    pub name: SimpleName,
    pub arguments: Vec<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAccess {
    pub expression: Box<Expr>,
    pub name: SimpleName,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperFieldAccess {
    pub name: SimpleName,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperMethodInvocation {
    pub type_arguments: Vec<Ty>,
    pub name: SimpleName,
    pub arguments: Vec<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayAccess {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassInstanceCreation {
    /// Outer-instance qualifier of `outer.new Inner()`.
    pub expression: Option<Box<Expr>>,
    pub type_arguments: Vec<Ty>,
    pub instance_type: Ty,
    pub arguments: Vec<Expr>,
    pub anonymous_class_body: Option<Vec<BodyDecl>>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayCreation {
    pub array_type: ArrayType,
    pub dimension_expressions: Vec<Expr>,
    pub initializer: Option<ArrayInitializer>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayInitializer {
    pub expressions: Vec<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenthesizedExpression {
    pub expression: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum LambdaBody {
    Block(Block),
    Expression(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaExpression {
    /// Inferred-form parameters are bare names; explicitly typed
    /// parameters come through as full declarations.
    pub parameters: Vec<SingleVariableDeclaration>,
    pub body: LambdaBody,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodReference {
    pub expression: Box<Expr>,
    pub type_arguments: Vec<Ty>,
    /// `None` for a constructor reference (`T::new`).
    pub name: Option<SimpleName>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThisExpression {
    pub qualifier: Option<Name>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeLiteral {
    pub literal_type: Ty,
    pub loc: Loc,
}

/// Integer or floating-point literal; `token` preserves the exact
/// source spelling including digit separators and suffixes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberLiteral {
    pub token: String,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterLiteral {
    /// Source spelling including the surrounding quotes and escapes.
    pub escaped_value: String,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    /// Source spelling including the surrounding quotes and escapes.
    pub escaped_value: String,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullLiteral {
    pub loc: Loc,
}

/// `final Type a = x, b` in for-initializer or try-resource position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarationExpression {
    pub modifiers: Vec<ExtendedModifier>,
    pub variable_type: Ty,
    pub fragments: Vec<VariableDeclarationFragment>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum Expr {
    Assignment(Assignment),
    ConditionalExpression(ConditionalExpression),
    InfixExpression(InfixExpression),
    InstanceofExpression(InstanceofExpression),
    PrefixExpression(PrefixExpression),
    PostfixExpression(PostfixExpression),
    CastExpression(CastExpression),
    MethodInvocation(MethodInvocation),
    FieldAccess(FieldAccess),
    SuperFieldAccess(SuperFieldAccess),
    SuperMethodInvocation(SuperMethodInvocation),
    ArrayAccess(ArrayAccess),
    ClassInstanceCreation(ClassInstanceCreation),
    ArrayCreation(ArrayCreation),
    ArrayInitializer(ArrayInitializer),
    ParenthesizedExpression(ParenthesizedExpression),
    LambdaExpression(LambdaExpression),
    MethodReference(MethodReference),
    ThisExpression(ThisExpression),
    TypeLiteral(TypeLiteral),
    SimpleName(SimpleName),
    QualifiedName(QualifiedName),
    NumberLiteral(NumberLiteral),
    BooleanLiteral(BooleanLiteral),
    CharacterLiteral(CharacterLiteral),
    StringLiteral(StringLiteral),
    NullLiteral(NullLiteral),
    VariableDeclarationExpression(VariableDeclarationExpression),
    /// Annotations can stand in element-value position.
    Annotation(Box<Annotation>),
}

impl Expr {
    pub fn loc(&self) -> Loc {
        match self {
            Expr::Assignment(e) => e.loc,
            Expr::ConditionalExpression(e) => e.loc,
            Expr::InfixExpression(e) => e.loc,
            Expr::InstanceofExpression(e) => e.loc,
            Expr::PrefixExpression(e) => e.loc,
            Expr::PostfixExpression(e) => e.loc,
            Expr::CastExpression(e) => e.loc,
            Expr::MethodInvocation(e) => e.loc,
            Expr::FieldAccess(e) => e.loc,
            Expr::SuperFieldAccess(e) => e.loc,
            Expr::SuperMethodInvocation(e) => e.loc,
            Expr::ArrayAccess(e) => e.loc,
            Expr::ClassInstanceCreation(e) => e.loc,
            Expr::ArrayCreation(e) => e.loc,
            Expr::ArrayInitializer(e) => e.loc,
            Expr::ParenthesizedExpression(e) => e.loc,
            Expr::LambdaExpression(e) => e.loc,
            Expr::MethodReference(e) => e.loc,
            Expr::ThisExpression(e) => e.loc,
            Expr::TypeLiteral(e) => e.loc,
            Expr::SimpleName(e) => e.loc,
            Expr::QualifiedName(e) => e.loc,
            Expr::NumberLiteral(e) => e.loc,
            Expr::BooleanLiteral(e) => e.loc,
            Expr::CharacterLiteral(e) => e.loc,
            Expr::StringLiteral(e) => e.loc,
            Expr::NullLiteral(e) => e.loc,
            Expr::VariableDeclarationExpression(e) => e.loc,
            Expr::Annotation(e) => e.loc(),
        }
    }
}

impl From<Name> for Expr {
    fn from(name: Name) -> Expr {
        match name {
            Name::SimpleName(n) => Expr::SimpleName(n),
            Name::QualifiedName(n) => Expr::QualifiedName(n),
        }
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub expression: Box<Expr>,
    pub then_statement: Box<Stmt>,
    pub else_statement: Option<Box<Stmt>>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStatement {
    pub initializers: Vec<Expr>,
    pub expression: Option<Box<Expr>>,
    pub updaters: Vec<Expr>,
    pub body: Box<Stmt>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancedForStatement {
    pub parameter: SingleVariableDeclaration,
    pub expression: Box<Expr>,
    pub body: Box<Stmt>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    pub expression: Box<Expr>,
    pub body: Box<Stmt>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoStatement {
    pub body: Box<Stmt>,
    pub expression: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub exception: SingleVariableDeclaration,
    pub body: Block,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TryStatement {
    pub resources: Vec<VariableDeclarationExpression>,
    pub body: Block,
    pub catch_clauses: Vec<CatchClause>,
    pub finally_block: Option<Block>,
    pub loc: Loc,
}

/// `case e:` or `default:`; appears inline in the switch statement
/// list, labelling the statements that follow it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    pub expression: Option<Box<Expr>>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchStatement {
    pub expression: Box<Expr>,
    pub statements: Vec<Stmt>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynchronizedStatement {
    pub expression: Box<Expr>,
    pub body: Block,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub expression: Option<Box<Expr>>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowStatement {
    pub expression: Box<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakStatement {
    pub label: Option<SimpleName>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinueStatement {
    pub label: Option<SimpleName>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledStatement {
    pub label: SimpleName,
    pub body: Box<Stmt>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyStatement {
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    pub expression: Box<Expr>,
    pub loc: Loc,
}

/// Local class or interface declaration in statement position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDeclarationStatement {
    pub declaration: TypeDeclaration,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertStatement {
    pub expression: Box<Expr>,
    pub message: Option<Box<Expr>>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarationStatement {
    pub modifiers: Vec<ExtendedModifier>,
    pub variable_type: Ty,
    pub fragments: Vec<VariableDeclarationFragment>,
    pub loc: Loc,
}

/// `this(...)` as the first statement of a constructor body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorInvocation {
    pub type_arguments: Vec<Ty>,
    pub arguments: Vec<Expr>,
    pub loc: Loc,
}

/// `super(...)` as the first statement of a constructor body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperConstructorInvocation {
    pub type_arguments: Vec<Ty>,
    pub arguments: Vec<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum Stmt {
    Block(Block),
    IfStatement(IfStatement),
    ForStatement(ForStatement),
    EnhancedForStatement(EnhancedForStatement),
    WhileStatement(WhileStatement),
    DoStatement(DoStatement),
    TryStatement(TryStatement),
    SwitchStatement(SwitchStatement),
    SwitchCase(SwitchCase),
    SynchronizedStatement(SynchronizedStatement),
    ReturnStatement(ReturnStatement),
    ThrowStatement(ThrowStatement),
    BreakStatement(BreakStatement),
    ContinueStatement(ContinueStatement),
    LabeledStatement(LabeledStatement),
    EmptyStatement(EmptyStatement),
    ExpressionStatement(ExpressionStatement),
    TypeDeclarationStatement(TypeDeclarationStatement),
    AssertStatement(AssertStatement),
    VariableDeclarationStatement(VariableDeclarationStatement),
    ConstructorInvocation(ConstructorInvocation),
    SuperConstructorInvocation(SuperConstructorInvocation),
    EndOfLineComment(EndOfLineComment),
    TraditionalComment(TraditionalComment),
    JavaDocComment(JavaDocComment),
    LineEmpty(LineEmpty),
}

impl Stmt {
    pub fn loc(&self) -> Loc {
        match self {
            Stmt::Block(s) => s.loc,
            Stmt::IfStatement(s) => s.loc,
            Stmt::ForStatement(s) => s.loc,
            Stmt::EnhancedForStatement(s) => s.loc,
            Stmt::WhileStatement(s) => s.loc,
            Stmt::DoStatement(s) => s.loc,
            Stmt::TryStatement(s) => s.loc,
            Stmt::SwitchStatement(s) => s.loc,
            Stmt::SwitchCase(s) => s.loc,
            Stmt::SynchronizedStatement(s) => s.loc,
            Stmt::ReturnStatement(s) => s.loc,
            Stmt::ThrowStatement(s) => s.loc,
            Stmt::BreakStatement(s) => s.loc,
            Stmt::ContinueStatement(s) => s.loc,
            Stmt::LabeledStatement(s) => s.loc,
            Stmt::EmptyStatement(s) => s.loc,
            Stmt::ExpressionStatement(s) => s.loc,
            Stmt::TypeDeclarationStatement(s) => s.loc,
            Stmt::AssertStatement(s) => s.loc,
            Stmt::VariableDeclarationStatement(s) => s.loc,
            Stmt::ConstructorInvocation(s) => s.loc,
            Stmt::SuperConstructorInvocation(s) => s.loc,
            Stmt::EndOfLineComment(s) => s.loc,
            Stmt::TraditionalComment(s) => s.loc,
            Stmt::JavaDocComment(s) => s.loc,
            Stmt::LineEmpty(s) => s.loc,
        }
    }

    /// `true` for the pass-through comment/blank-line markers.
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            Stmt::EndOfLineComment(_)
                | Stmt::TraditionalComment(_)
                | Stmt::JavaDocComment(_)
                | Stmt::LineEmpty(_)
        )
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarationFragment {
    pub name: SimpleName,
    pub extra_dimensions: u32,
    pub initializer: Option<Expr>,
    pub loc: Loc,
}

/// A single formal: method, catch, for-each, or lambda parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleVariableDeclaration {
    pub modifiers: Vec<ExtendedModifier>,
    /// `None` only for inferred lambda parameters.
    pub parameter_type: Option<Ty>,
    pub varargs: bool,
    pub name: SimpleName,
    pub extra_dimensions: u32,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDeclaration {
    pub modifiers: Vec<ExtendedModifier>,
    pub constructor: bool,
    pub type_parameters: Vec<TypeParameter>,
    /// `None` only for constructors.
    pub return_type2: Option<Ty>,
    pub name: SimpleName,
    pub parameters: Vec<SingleVariableDeclaration>,
    pub extra_dimensions: u32,
    pub thrown_exceptions: Vec<Name>,
    pub body: Option<Block>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDeclaration {
    pub modifiers: Vec<ExtendedModifier>,
    pub field_type: Ty,
    pub fragments: Vec<VariableDeclarationFragment>,
    pub loc: Loc,
}

/// Instance or static initializer block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Initializer {
    pub modifiers: Vec<ExtendedModifier>,
    pub body: Block,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDeclaration {
    pub modifiers: Vec<ExtendedModifier>,
    pub interface: bool,
    pub name: SimpleName,
    pub type_parameters: Vec<TypeParameter>,
    pub superclass_type: Option<Ty>,
    pub super_interface_types: Vec<Ty>,
    pub body_declarations: Vec<BodyDecl>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumConstantDeclaration {
    pub modifiers: Vec<ExtendedModifier>,
    pub name: SimpleName,
    pub arguments: Vec<Expr>,
    pub anonymous_class_body: Option<Vec<BodyDecl>>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDeclaration {
    pub modifiers: Vec<ExtendedModifier>,
    pub name: SimpleName,
    pub super_interface_types: Vec<Ty>,
    pub enum_constants: Vec<EnumConstantDeclaration>,
    pub body_declarations: Vec<BodyDecl>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationTypeMemberDeclaration {
    pub modifiers: Vec<ExtendedModifier>,
    pub member_type: Ty,
    pub name: SimpleName,
    pub default_value: Option<Expr>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationTypeDeclaration {
    pub modifiers: Vec<ExtendedModifier>,
    pub name: SimpleName,
    pub body_declarations: Vec<BodyDecl>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum TypeDecl {
    TypeDeclaration(TypeDeclaration),
    EnumDeclaration(EnumDeclaration),
    AnnotationTypeDeclaration(AnnotationTypeDeclaration),
}

impl TypeDecl {
    pub fn loc(&self) -> Loc {
        match self {
            TypeDecl::TypeDeclaration(d) => d.loc,
            TypeDecl::EnumDeclaration(d) => d.loc,
            TypeDecl::AnnotationTypeDeclaration(d) => d.loc,
        }
    }

    pub fn body_declarations(&self) -> &[BodyDecl] {
        match self {
            TypeDecl::TypeDeclaration(d) => &d.body_declarations,
            TypeDecl::EnumDeclaration(d) => &d.body_declarations,
            TypeDecl::AnnotationTypeDeclaration(d) => &d.body_declarations,
        }
    }
}

/// Member position inside a type body. Comment and blank-line markers
/// interleave here just as they do in statement lists.
#[derive(Debug, Clone, PartialEq, Serialize, From)]
#[serde(tag = "type")]
pub enum BodyDecl {
    FieldDeclaration(FieldDeclaration),
    MethodDeclaration(MethodDeclaration),
    Initializer(Initializer),
    TypeDeclaration(Box<TypeDecl>),
    AnnotationTypeMemberDeclaration(AnnotationTypeMemberDeclaration),
    EndOfLineComment(EndOfLineComment),
    TraditionalComment(TraditionalComment),
    JavaDocComment(JavaDocComment),
    LineEmpty(LineEmpty),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageDeclaration {
    pub annotations: Vec<Annotation>,
    pub name: Name,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDeclaration {
    pub static_import: bool,
    pub name: Name,
    pub on_demand: bool,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationUnit {
    pub package: Option<PackageDeclaration>,
    pub imports: Vec<ImportDeclaration>,
    pub types: Vec<TypeDecl>,
    pub loc: Loc,
}

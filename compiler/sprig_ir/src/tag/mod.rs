//! Node tags and their static metadata.
//!
//! | Tag                                      | Shape  | Prec | Assoc |
//! |------------------------------------------|--------|-----:|-------|
//! | `number` `string` `char` `identifier`    | Void   | 0    | right |
//! | `block_and`                              | List   | 1    | left  |
//! | `block_or`                               | List   | 2    | left  |
//! | `enum_and`                               | List   | 3    | left  |
//! | `enum_or`                                | List   | 4    | left  |
//! | `assign`                                 | Pair   | 5    | left  |
//! | `add` `sub` `concat`                     | Pair   | 6    | left  |
//! | `mul` `div`                              | Pair   | 7    | left  |
//! | `pow`                                    | Pair   | 8    | right |
//! | `negate`                                 | Single | 9    | left  |
//! | `group` `block_assign` `attrs` `value`   | Single | 0    | right |
//! | `name_def` `if` `elif` `else` `for` `while` | List | 0   | right |
//!
//! Precedence 0 means "not an operator". On the parser's operator stack such
//! tags act as scope markers that no reduction crosses.

/// Kind of a syntax tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeTag {
    // Leaves
    Number,
    String,
    Char,
    Identifier,

    // Enumerations
    BlockAnd,
    BlockOr,
    EnumAnd,
    EnumOr,

    // Arithmetic
    Assign,
    Add,
    Sub,
    Concat,
    Mul,
    Div,
    Pow,
    Negate,

    // Scope markers
    Group,
    BlockAssign,

    // Definitions
    NameDef,
    Attrs,
    Value,

    // Control constructs
    If,
    Elif,
    Else,
    For,
    While,
}

/// Payload shape of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Void,
    Single,
    Pair,
    List,
}

impl NodeTag {
    pub const COUNT: usize = 26;

    /// Every tag, in declaration order.
    pub const ALL: [NodeTag; Self::COUNT] = [
        Self::Number,
        Self::String,
        Self::Char,
        Self::Identifier,
        Self::BlockAnd,
        Self::BlockOr,
        Self::EnumAnd,
        Self::EnumOr,
        Self::Assign,
        Self::Add,
        Self::Sub,
        Self::Concat,
        Self::Mul,
        Self::Div,
        Self::Pow,
        Self::Negate,
        Self::Group,
        Self::BlockAssign,
        Self::NameDef,
        Self::Attrs,
        Self::Value,
        Self::If,
        Self::Elif,
        Self::Else,
        Self::For,
        Self::While,
    ];

    #[inline]
    pub fn shape(self) -> Shape {
        SHAPES[self as usize]
    }

    /// Binding strength; 0 for anything that is not an operator.
    #[inline]
    pub fn precedence(self) -> u8 {
        PRECEDENCE[self as usize]
    }

    /// `pow` and every precedence-0 tag associate to the right.
    #[inline]
    pub fn is_right_assoc(self) -> bool {
        self == Self::Pow || self.precedence() == 0
    }

    /// Precedence-0 tags on the operator stack delimit a scope.
    #[inline]
    pub fn is_marker(self) -> bool {
        self.precedence() == 0
    }

    /// Whether a pending `self` must be reduced before `incoming` is pushed.
    #[inline]
    pub fn reduces_before(self, incoming: NodeTag) -> bool {
        let (pending, next) = (self.precedence(), incoming.precedence());
        pending > next || (pending == next && !self.is_right_assoc())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Char => "char",
            Self::Identifier => "identifier",
            Self::BlockAnd => "block_and",
            Self::BlockOr => "block_or",
            Self::EnumAnd => "enum_and",
            Self::EnumOr => "enum_or",
            Self::Assign => "assign",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Concat => "concat",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Pow => "pow",
            Self::Negate => "negate",
            Self::Group => "group",
            Self::BlockAssign => "block_assign",
            Self::NameDef => "name_def",
            Self::Attrs => "attrs",
            Self::Value => "value",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::For => "for",
            Self::While => "while",
        }
    }
}

/// Shape per tag, indexed by `tag as usize`.
static SHAPES: [Shape; NodeTag::COUNT] = [
    Shape::Void,   // number
    Shape::Void,   // string
    Shape::Void,   // char
    Shape::Void,   // identifier
    Shape::List,   // block_and
    Shape::List,   // block_or
    Shape::List,   // enum_and
    Shape::List,   // enum_or
    Shape::Pair,   // assign
    Shape::Pair,   // add
    Shape::Pair,   // sub
    Shape::Pair,   // concat
    Shape::Pair,   // mul
    Shape::Pair,   // div
    Shape::Pair,   // pow
    Shape::Single, // negate
    Shape::Single, // group
    Shape::Single, // block_assign
    Shape::List,   // name_def
    Shape::Single, // attrs
    Shape::Single, // value
    Shape::List,   // if
    Shape::List,   // elif
    Shape::List,   // else
    Shape::List,   // for
    Shape::List,   // while
];

/// Precedence per tag, indexed by `tag as usize`.
static PRECEDENCE: [u8; NodeTag::COUNT] = [
    0, 0, 0, 0, // leaves
    1, 2, 3, 4, // block_and block_or enum_and enum_or
    5, // assign
    6, 6, 6, // add sub concat
    7, 7, // mul div
    8, // pow
    9, // negate
    0, 0, // group block_assign
    0, 0, 0, // name_def attrs value
    0, 0, 0, 0, 0, // if elif else for while
];

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Char,
    Long,
    String,
    Float,
    /// A subroutine local or formal. Only the name is reserved globally;
    /// the storage lives in the frame.
    Local,
    Subroutine { arity: usize },
}

impl Type {
    /// Whether a value of this type can be loaded, stored or read into.
    pub fn is_variable(&self) -> bool {
        !matches!(self, Type::Subroutine { .. } | Type::Local)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Char => write!(f, "char"),
            Type::Long => write!(f, "long"),
            Type::String => write!(f, "string"),
            Type::Float => write!(f, "float"),
            Type::Local => write!(f, "local"),
            Type::Subroutine { arity } => write!(f, "subroutine/{}", arity),
        }
    }
}

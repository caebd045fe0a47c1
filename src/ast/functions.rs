use std::fmt;

/// The fixed set of functions callable from an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `exists(path)` - the field is present
    Exists,
    /// `nexists(path)` - the field is absent
    NotExists,
    /// `contains(text)` - case-insensitive substring match
    Contains,
    /// `regex(pattern)` - case-insensitive pattern match
    Regex,
    /// `date(text[, layout])` - absolute timestamp
    Date,
    /// `dateRelative(duration)` - timestamp relative to now
    DateRelative,
    /// `search(term, ...)` - full-text search
    Search,
}

impl Builtin {
    pub const ALL: [Builtin; 7] = [
        Builtin::Exists,
        Builtin::NotExists,
        Builtin::Contains,
        Builtin::Regex,
        Builtin::Date,
        Builtin::DateRelative,
        Builtin::Search,
    ];

    /// Look up a function by the name used in source text. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exists => "exists",
            Builtin::NotExists => "nexists",
            Builtin::Contains => "contains",
            Builtin::Regex => "regex",
            Builtin::Date => "date",
            Builtin::DateRelative => "dateRelative",
            Builtin::Search => "search",
        }
    }

    /// Fewest arguments the function accepts.
    pub fn min_arity(self) -> usize {
        match self {
            Builtin::Search => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

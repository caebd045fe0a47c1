//! Documentation content for mongoq CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Functions,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "functions" | "function" | "builtins" => Some(Self::Functions),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"MONGOQ DOCUMENTATION

mongoq compiles compact filter expressions into MongoDB query documents.

  age > 10 && (name == "Alice" || name == "Bob")

becomes

  {"$or":[{"name":"Alice"},{"name":"Bob"}],"age":{"$gt":10}}

DOCUMENTATION CATEGORIES

  syntax            Literals, field names, dotted paths, grouping, precedence
  operators         Comparison, logical, membership and negation operators
  functions         exists, nexists, contains, regex, date, dateRelative, search

QUICK REFERENCE

  name              Field exists
  !name             Field does not exist
  a.b.c == 1        Dotted field path
  x == ("A" | "B")  One of ($in)
  x == ("A" & "B")  All of ($all)

Run 'mongoq doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX

LITERALS
  42  -7            Integers (64-bit)
  3.14  2e10        Floats
  "text"            Strings; \" \\ \n \t \r escapes are resolved
  true  false       Booleans (bare words, any case)

STRING VALUES
  "5fc4722ae367f19055977d1f"   24 hex characters become an ObjectId
  "/^Al.*ce$/"                 Slash-delimited text is a regex (case-insensitive)
  "Al*ce"                      '*' is a wildcard (case-insensitive regex)

FIELD NAMES
  name              Bare name
  person.age        Dotted path, no spaces around the dots
  "data.0.x"        Quote paths whose segments are not plain names
  "type"            'type' is reserved and must be quoted

EXISTENCE
  A field name standing alone, or joined only by && and ||, means the field
  must exist:

    name                      {"name":{"$exists":true}}
    name && age > 10          {"age":{"$gt":10},"name":{"$exists":true}}

PRECEDENCE (tightest first)
  primary           literal, name, path, call, ( ... )
  unary             !
  relational        ==  !=  <  <=  >  >=
  membership        &   then   |
  and               &&  and
  or                ||  or
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

COMPARISON
  a == v            {"a": v}
  a != v            {"a": {"$ne": v}}
  a <  v            {"a": {"$lt": v}}     v must be a number or timestamp
  a <= v            {"a": {"$lte": v}}
  a >  v            {"a": {"$gt": v}}
  a >= v            {"a": {"$gte": v}}

LOGICAL
  x && y            Merged into one document when the keys differ,
                    {"$and": [x, y]} when a key repeats
  x || y            {"$or": [x, y, ...]}, chains are flattened
  and / or          Word forms, any letter case

MEMBERSHIP (inside parentheses, right of == or !=)
  a == ("A" | "B")  {"a": {"$in": ["A", "B"]}}
  a != ("A" | "B")  {"a": {"$nin": ["A", "B"]}}
  a == ("A" & "B")  {"a": {"$all": ["A", "B"]}}

  '&' and '|' cannot be mixed in one group, and '&' is only valid under ==.

NEGATION
  !name             {"name": {"$exists": false}}
  !(expr)           {"$not": expr}
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS

Arguments are names, dotted paths, or quoted strings.

  exists(path)              {"path": {"$exists": true}}
  nexists(path)             {"path": {"$exists": false}}
  contains(text)            Case-insensitive regex .*text.*
  regex(pattern)            Case-insensitive regex, \\ collapses to \
  date(text)                RFC 3339 timestamp
  date(text, layout)        Timestamp in a custom layout, either strftime
                            ("%Y%m%d") or reference-date ("20060102")
  dateRelative(duration)    Now plus a signed duration: "-24h", "1h30m", "90s"
  search(term, ...)         {"$text": {"$search": "term ..."}}
                            Prefix a term with '-' (quoted) to exclude it

Examples:
  name == contains(ali)
  ts >= date("2020-12-01T00:00:00Z")
  updated > dateRelative("-24h")
  search(bob, willy, "-joe")
"#;

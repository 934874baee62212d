//! Readable names for compiler type paths, used by fixture scripts and reports.

use serde::{Deserialize, Serialize};

/// A parsed `std::any::type_name` string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSymbol {
    /// Leading module path segments of the outermost type
    pub path: Vec<String>,
    /// Last path segment, without generic arguments
    pub name: String,
    /// Generic arguments rendered with their short names
    pub generics: Vec<TypeSymbol>,
    pub is_dyn: bool,
}

impl TypeSymbol {
    pub fn parse(type_name: &str) -> Self {
        let trimmed = type_name.trim();
        let (is_dyn, rest) = match trimmed.strip_prefix("dyn ") {
            Some(rest) => (true, rest.trim()),
            None => (false, trimmed),
        };
        // `dyn Trait + Send + Sync`: only the principal trait names the type.
        let rest = split_top_level(rest, '+')
            .into_iter()
            .next()
            .unwrap_or_default()
            .trim();

        let (head, generics) = match rest.find('<') {
            Some(open) if rest.ends_with('>') => {
                let inner = &rest[open + 1..rest.len() - 1];
                let args = split_top_level(inner, ',')
                    .into_iter()
                    .filter(|a| !a.trim().is_empty())
                    .map(TypeSymbol::parse)
                    .collect();
                (&rest[..open], args)
            }
            _ => (rest, Vec::new()),
        };

        let mut path: Vec<String> = head
            .split("::")
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        let name = path.pop().unwrap_or_default();

        Self {
            path,
            name,
            generics,
            is_dyn,
        }
    }

    /// `Vec<String>`, `dyn ILogger`, `HashMap<String, u32>`
    pub fn short_name(&self) -> String {
        let mut out = String::new();
        if self.is_dyn {
            out.push_str("dyn ");
        }
        out.push_str(&self.name);
        if !self.generics.is_empty() {
            let args: Vec<String> = self.generics.iter().map(|g| g.short_name()).collect();
            out.push('<');
            out.push_str(&args.join(", "));
            out.push('>');
        }
        out
    }

    /// Name as it would appear in an expression position (`Vec::<String>`)
    pub fn expression_name(&self) -> String {
        if self.generics.is_empty() {
            return self.name.clone();
        }
        let args: Vec<String> = self.generics.iter().map(|g| g.short_name()).collect();
        format!("{}::<{}>", self.name, args.join(", "))
    }

    /// snake_case binding name: `ILogger` → `logger`, `Vec<String>` → `string_vec`
    pub fn variable_name(&self) -> String {
        let name = self.stem();
        if name.is_empty() {
            return "value".to_string();
        }
        if RESERVED.contains(&name.as_str()) {
            return format!("{}_value", name);
        }
        name
    }

    fn stem(&self) -> String {
        let mut name = to_snake_case(strip_interface_prefix(&self.name));
        for generic in self.generics.iter().rev() {
            name = format!("{}_{}", generic.stem(), name);
        }
        name
    }
}

/// Keywords and primitive type names that make poor bindings
const RESERVED: &[&str] = &[
    "type", "self", "ref", "mod", "fn", "let", "impl", "str", "bool", "char", "i8", "i16",
    "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32", "f64",
];

/// `IDataSource` names an interface in many codebases; the binding reads better without the `I`.
fn strip_interface_prefix(name: &str) -> &str {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some('I'), Some(second)) if second.is_ascii_uppercase() => &name[1..],
        _ => name,
    }
}

fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        }
    }
    out
}

fn split_top_level(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

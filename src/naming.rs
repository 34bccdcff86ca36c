//! Case conversion and inflection for table, class and namespace names.

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

pub fn snake(name: &str) -> String {
    name.to_snake_case()
}

/// Class name for a table: `user_profiles` -> `UserProfiles`.
pub fn studly(name: &str) -> String {
    name.to_upper_camel_case()
}

pub fn camel(name: &str) -> String {
    name.to_lower_camel_case()
}

pub fn kebab(name: &str) -> String {
    name.to_kebab_case()
}

/// English plural of the last word of a snake_case name.
///
/// Words that already look plural are returned unchanged.
pub fn plural(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let (head, word) = match name.rfind('_') {
        Some(index) => name.split_at(index + 1),
        None => ("", name),
    };

    format!("{}{}", head, plural_word(word))
}

fn plural_word(word: &str) -> String {
    let lower = word.to_lowercase();

    match lower.as_str() {
        "person" => return "people".to_string(),
        "child" => return "children".to_string(),
        "man" => return "men".to_string(),
        "woman" => return "women".to_string(),
        "mouse" => return "mice".to_string(),
        "data" | "information" | "equipment" | "news" | "series" | "species" => {
            return word.to_string()
        }
        _ => {}
    }

    if lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
    {
        return word.to_string();
    }

    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", word);
    }

    if lower.ends_with('y') {
        let before = lower.chars().rev().nth(1);
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    format!("{}s", word)
}

/// Short name to reference `class` from inside `namespace`, plus the import it
/// needs when the class lives elsewhere.
///
/// ```
/// use eloquent_forge::naming::relative_class;
///
/// assert_eq!(relative_class("App\\Models", "App\\Models\\Model"), ("Model".to_string(), None));
/// assert_eq!(
///     relative_class("App\\Models\\Contracts", "Overlord\\Model\\OverlordModel"),
///     ("OverlordModel".to_string(), Some("Overlord\\Model\\OverlordModel".to_string())),
/// );
/// ```
pub fn relative_class(namespace: &str, class: &str) -> (String, Option<String>) {
    let class = class.trim_start_matches('\\');
    let scope = format!("{}\\", namespace.trim_matches('\\'));

    if let Some(short) = class.strip_prefix(&scope) {
        return (short.to_string(), None);
    }

    match class.rfind('\\') {
        Some(index) => (class[index + 1..].to_string(), Some(class.to_string())),
        None => (class.to_string(), None),
    }
}

/// `app\Models` -> `app/Models`, without leading or trailing separators.
pub fn dir_to_path(dir: &str) -> String {
    dir.replace('\\', "/").trim_matches('/').to_string()
}

use std::collections::HashMap;

/// A lookup entry mapping a raw user id to a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

/// A record carrying a raw user id, such as a comment or a message.
pub trait Authored {
    fn user_id(&self) -> &str;
    fn set_user_id(&mut self, user_id: String);
}

/// Rewrites each record's user id to `"<name>-<id>"` when the id appears
/// in the lookup; unmatched records pass through unchanged.
///
/// Returns a new vector of the same length and order. The lookup is never
/// mutated.
pub fn tag_usernames<T>(items: &[T], users: &[UserRef]) -> Vec<T>
where
    T: Authored + Clone,
{
    let names: HashMap<&str, &str> = users
        .iter()
        .map(|u| (u.id.as_str(), u.name.as_str()))
        .collect();

    items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if let Some(name) = names.get(item.user_id()) {
                let tagged = format!("{}-{}", name, item.user_id());
                item.set_user_id(tagged);
            }
            item
        })
        .collect()
}

/// Splits a comma-separated string, dropping a leading empty element.
pub fn split_csv(input: &str) -> Vec<String> {
    let mut parts: Vec<String> = input.split(',').map(str::to_string).collect();

    if parts.first().map(String::as_str) == Some("") {
        parts.remove(0);
    }

    parts
}

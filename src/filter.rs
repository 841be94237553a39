//! Course category filter, kept in sync with the `?category=` query parameter.

use std::fmt;

use url::form_urlencoded;

pub const CATEGORY_PARAM: &str = "category";
pub const ALL: &str = "all";
pub const COURSES_PATH: &str = "/courses/";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Named(String),
}

impl Category {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            Category::All
        } else {
            Category::Named(value.to_string())
        }
    }

    /// `data-category` value of the filter element for this category.
    pub fn as_str(&self) -> &str {
        match self {
            Category::All => ALL,
            Category::Named(name) => name,
        }
    }

    /// Category carried by a `location.search` string, if any.
    pub fn from_search(search: &str) -> Option<Self> {
        let query = search.strip_prefix('?').unwrap_or(search);
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == CATEGORY_PARAM)
            .map(|(_, value)| Category::parse(&value))
    }

    /// Whether a card tagged `card_category` shows under this filter.
    pub fn shows(&self, card_category: Option<&str>) -> bool {
        match self {
            Category::All => true,
            Category::Named(name) => card_category == Some(name.as_str()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn category_query(category: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(CATEGORY_PARAM, category)
        .finish()
}

/// URL pushed to history after selecting `category` on `pathname`.
pub fn filter_url(pathname: &str, category: &Category) -> String {
    match category {
        Category::All => pathname.to_string(),
        Category::Named(name) => format!("{pathname}?{}", category_query(name)),
    }
}

/// Link target used by category tiles outside the course list.
pub fn courses_url(category: &Category) -> String {
    format!("{COURSES_PATH}?{}", category_query(category.as_str()))
}

/// Category to apply on page load. `available` lists the `data-category`
/// values of the filter elements present on the page; a URL category with no
/// matching element leaves the page untouched.
pub fn initial_selection(search: &str, available: &[&str]) -> Option<Category> {
    let wanted = Category::from_search(search).unwrap_or_default();
    available
        .iter()
        .any(|c| *c == wanted.as_str())
        .then_some(wanted)
}

/// Visibility of each card under `selected`, in card order.
pub fn visibility<'a>(
    selected: &Category,
    cards: impl IntoIterator<Item = Option<&'a str>>,
) -> Vec<bool> {
    cards.into_iter().map(|c| selected.shows(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDS: [Option<&str>; 4] = [Some("full_stack"), Some("data"), None, Some("full_stack")];

    #[test]
    fn selecting_category_round_trips_through_url() {
        let selected = Category::parse("full_stack");
        let url = filter_url("/courses/", &selected);
        assert_eq!(url, "/courses/?category=full_stack");

        let shown = visibility(&selected, CARDS);
        assert_eq!(shown, vec![true, false, false, true]);

        // reloading the pushed URL reproduces the same visible set
        let search = &url[url.find('?').unwrap_or(url.len())..];
        let restored = initial_selection(search, &["all", "full_stack", "data"]).unwrap();
        assert_eq!(restored, selected);
        assert_eq!(visibility(&restored, CARDS), shown);
    }

    #[test]
    fn all_clears_query_and_shows_everything() {
        assert_eq!(filter_url("/courses/", &Category::All), "/courses/");
        assert_eq!(visibility(&Category::All, CARDS), vec![true; 4]);
        assert_eq!(Category::from_search("?category=all"), Some(Category::All));
    }

    #[test]
    fn missing_param_defaults_to_all_when_present() {
        assert_eq!(initial_selection("", &["all", "data"]), Some(Category::All));
        assert_eq!(initial_selection("?page=2", &["data"]), None);
    }

    #[test]
    fn unknown_url_category_is_ignored() {
        assert_eq!(initial_selection("?category=cooking", &["all", "data"]), None);
    }

    #[test]
    fn query_values_are_encoded() {
        let category = Category::parse("ui ux&design");
        assert_eq!(filter_url("/courses/", &category), "/courses/?category=ui+ux%26design");
        assert_eq!(Category::from_search("?category=ui+ux%26design"), Some(category.clone()));
        assert_eq!(courses_url(&category), "/courses/?category=ui+ux%26design");
        assert_eq!(category.to_string(), "ui ux&design");
    }
}

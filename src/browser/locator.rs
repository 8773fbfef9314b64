use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nth {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Button,
    Textbox,
}

/// How to find an element on the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css { selector: String, nth: Nth },
    /// First element matching `selector` whose text contains `text`
    CssWithText { selector: String, text: String },
    /// Element with the given role whose accessible name contains `name`
    Role { role: Role, name: String },
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css {
            selector: selector.to_string(),
            nth: Nth::First,
        }
    }

    pub fn last(selector: &str) -> Self {
        Locator::Css {
            selector: selector.to_string(),
            nth: Nth::Last,
        }
    }

    pub fn with_text(selector: &str, text: &str) -> Self {
        Locator::CssWithText {
            selector: selector.to_string(),
            text: text.to_string(),
        }
    }

    pub fn button(name: &str) -> Self {
        Locator::Role {
            role: Role::Button,
            name: name.to_string(),
        }
    }

    pub fn textbox(name: &str) -> Self {
        Locator::Role {
            role: Role::Textbox,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css {
                selector,
                nth: Nth::First,
            } => write!(f, "'{}'", selector),
            Locator::Css {
                selector,
                nth: Nth::Last,
            } => write!(f, "last '{}'", selector),
            Locator::CssWithText { selector, text } => {
                write!(f, "'{}' with text \"{}\"", selector, text)
            }
            Locator::Role { role, name } => {
                let role = match role {
                    Role::Button => "button",
                    Role::Textbox => "textbox",
                };
                write!(f, "{} \"{}\"", role, name)
            }
        }
    }
}

/// Quote a string as an XPath 1.0 literal
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// XPath approximating an accessible-name match for a role
pub fn role_xpath(role: Role, name: &str) -> String {
    let n = xpath_literal(name);
    match role {
        Role::Button => format!(
            "//button[contains(normalize-space(.), {n}) or contains(@aria-label, {n})] \
             | //*[@role='button'][contains(normalize-space(.), {n}) or contains(@aria-label, {n})] \
             | //input[@type='submit' or @type='button'][contains(@value, {n})]"
        ),
        Role::Textbox => format!(
            "//input[not(@type) or @type='text' or @type='email' or @type='password' \
             or @type='tel' or @type='search'][contains(@aria-label, {n}) \
             or contains(@placeholder, {n}) or @id = //label[contains(normalize-space(.), {n})]/@for] \
             | //textarea[contains(@aria-label, {n}) or contains(@placeholder, {n})]"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xpath_literal_quoting() {
        assert_eq!(xpath_literal("Next"), "'Next'");
        assert_eq!(xpath_literal("it's"), "\"it's\"");
        assert_eq!(
            xpath_literal(r#"it's "x""#),
            r#"concat('it', "'", 's "x"')"#
        );
    }

    #[test]
    fn test_role_xpath_button() {
        let xpath = role_xpath(Role::Button, "Export To Excel");
        assert!(xpath.starts_with("//button[contains(normalize-space(.), 'Export To Excel')"));
        assert!(xpath.contains("@role='button'"));
        assert!(xpath.contains("contains(@value, 'Export To Excel')"));
    }

    #[test]
    fn test_role_xpath_textbox() {
        let xpath = role_xpath(Role::Textbox, "Enter the password for");
        assert!(xpath.contains("@type='password'"));
        assert!(xpath.contains("contains(@aria-label, 'Enter the password for')"));
        assert!(xpath.contains("//textarea"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Locator::button("View").to_string(), "button \"View\"");
        assert_eq!(
            Locator::last(".cdk-overlay-backdrop").to_string(),
            "last '.cdk-overlay-backdrop'"
        );
        assert_eq!(
            Locator::with_text("#panel div", "Select All").to_string(),
            "'#panel div' with text \"Select All\""
        );
    }
}

///! Keyword tables backing the intent decision table

pub(crate) const SEARCH: &[&str] = &["search", "query", "name=\"q\""];
pub(crate) const EMAIL: &[&str] = &["email", "e-mail"];
pub(crate) const PASSWORD: &[&str] = &["password", "passwd", "pwd"];
pub(crate) const PAYMENT: &[&str] = &["card", "payment", "cvv", "cvc"];
pub(crate) const USERNAME: &[&str] = &["username", "user", "login", "account"];
pub(crate) const SUBMIT: &[&str] = &[
    "submit", "save", "sign in", "signin", "log in", "login", "continue", "next", "send",
    "confirm",
];
pub(crate) const AUTH: &[&str] = &["login", "log in", "sign in", "signin", "password", "auth"];
pub(crate) const DISMISS: &[&str] = &["close", "dismiss", "cancel", "no thanks"];
pub(crate) const MENU: &[&str] = &["menu", "dropdown", "hamburger", "more options"];
pub(crate) const PURCHASE: &[&str] = &["add to cart", "buy", "checkout", "purchase", "order"];
pub(crate) const UPLOAD: &[&str] = &["upload", "file", "dropzone", "attachment"];

/// True when any keyword occurs in the lower-cased haystack.
pub(crate) fn mentions(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

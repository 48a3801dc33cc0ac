/// The single page served at `/`. It talks to `/api/joke` and `/api/feedback`.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

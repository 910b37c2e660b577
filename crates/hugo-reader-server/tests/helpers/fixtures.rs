//! Canned site data.

pub const SITE: &str = "https://example.com";

pub const INDEX: &str = r#"{
  "pages": [
    {
      "title": "Hello World",
      "url": "/posts/hello-world/",
      "slug": "hello-world",
      "section": "posts",
      "summary": "A first post about Rust",
      "content": "Rust is fast. Rust is safe.",
      "tags": ["rust", "intro"],
      "categories": ["programming"],
      "type": "post"
    },
    {
      "title": "About",
      "url": "/about/",
      "section": "pages",
      "content": "Who we are",
      "type": "page"
    }
  ]
}"#;

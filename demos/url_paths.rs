//! Routes URLs by their path segments
use piece_trie::{PushPiece, Trie, VecTrie};
use url::Url;

fn segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|parts| {
            parts
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Each path segment is one piece; URLs under the same directory share nodes
    let mut routes: VecTrie<String, &str> = Trie::new(PushPiece);

    let pages = [
        ("https://example.com/", "Home page"),
        ("https://example.com/about", "About us"),
        ("https://example.com/contact", "Contact info"),
        ("https://example.com/blog", "Blog index"),
        ("https://example.com/blog/first-post", "First blog post"),
        ("https://example.com/blog/2024/recap", "Yearly recap"),
    ];
    for (address, title) in pages {
        let url = Url::parse(address)?;
        routes.emplace(&segments(&url), title);
    }

    println!("Routes:");
    for (path, title) in &routes {
        println!("  /{} -> {}", path.join("/"), title);
    }

    println!("\nLookups:");
    for address in [
        "https://example.com/blog/first-post?ref=feed",
        "https://example.com/blog/2024",
        "https://example.com/unknown",
    ] {
        let url = Url::parse(address)?;
        match routes.get(&segments(&url)) {
            Some(title) => println!("  {} -> {}", url.path(), title),
            None => println!("  {} -> not found", url.path()),
        }
    }

    Ok(())
}

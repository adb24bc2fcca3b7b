// Built-in sample snippets for the gallery
//
// Shown when no files are given on the command line. The mix exercises
// the main highlighting paths: an explicit language tag, first-line
// detection, and a data format.
//
// Run with: cargo run --release

/// A sample snippet for the gallery
pub struct Sample {
    /// Caption rendered above the block
    pub caption: &'static str,
    /// Language tag, or None for first-line detection
    pub language: Option<&'static str>,
    /// Raw source text, trimmed by the block itself
    pub source: &'static str,
}

/// The built-in gallery content
pub fn samples() -> Vec<Sample> {
    vec![
        Sample {
            caption: "Explicit language tag (rust)",
            language: Some("rust"),
            source: RUST_SAMPLE,
        },
        Sample {
            caption: "Auto-detected from the shebang line",
            language: None,
            source: SHELL_SAMPLE,
        },
        Sample {
            caption: "Explicit language tag (toml)",
            language: Some("toml"),
            source: TOML_SAMPLE,
        },
    ]
}

const RUST_SAMPLE: &str = r#"
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => {
            let (mut a, mut b) = (0u64, 1u64);
            for _ in 2..=n {
                let next = a + b;
                a = b;
                b = next;
            }
            b
        }
    }
}

fn main() {
    for n in 0..10 {
        println!("fib({}) = {}", n, fibonacci(n));
    }
}
"#;

const SHELL_SAMPLE: &str = r#"
#!/bin/sh
# Rotate logs older than a week
find ./logs -name '*.log' -mtime +7 -print |
while read -r f; do
    gzip "$f" && mv "$f.gz" ./logs/archive/
done
echo "rotation complete"
"#;

const TOML_SAMPLE: &str = r#"
[package]
name = "codepane"
version = "0.1.0"
edition = "2021"

[dependencies]
ratatui = "0.29"
syntect = "5"
tokio = { version = "1", features = ["full"] }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    /// First-line detection needs the shebang to survive trimming
    #[test]
    fn test_shell_sample_starts_with_shebang() {
        let sample = &samples()[1];
        assert!(sample.language.is_none());
        assert!(sample.source.trim_start().starts_with("#!/bin/sh"));
    }
}

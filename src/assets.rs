// Shared syntax highlighting assets
//
// Syntax and theme definitions are bundled into the binary but cost real
// time to deserialize, so they load once per process and every code block
// shares the result. The first block to render triggers the load; later
// blocks await the same cell and get the cached Arc.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use tokio::sync::OnceCell;

/// Bundled syntax definitions and color themes
#[derive(Debug)]
pub struct HighlightAssets {
    pub syntaxes: SyntaxSet,
    pub themes: ThemeSet,
}

/// Memoizing loader for [`HighlightAssets`]
///
/// All code blocks in a process share one loader. Concurrent callers of
/// [`ensure_loaded`](Self::ensure_loaded) collapse into a single load, and
/// the deserialization runs on the blocking pool so the render loop never
/// stalls behind it.
pub struct AssetLoader {
    cell: OnceCell<Arc<HighlightAssets>>,
    loads: AtomicUsize,
}

impl AssetLoader {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Load the bundled assets, or return the cached copy.
    ///
    /// The first caller pays the deserialization cost; everyone else awaits
    /// the same cell and clones the Arc.
    pub async fn ensure_loaded(&self) -> Arc<HighlightAssets> {
        self.cell
            .get_or_init(|| async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                let started = Instant::now();
                let assets = tokio::task::spawn_blocking(|| HighlightAssets {
                    syntaxes: SyntaxSet::load_defaults_newlines(),
                    themes: ThemeSet::load_defaults(),
                })
                .await
                .expect("highlight asset load panicked");
                tracing::debug!(
                    "Loaded highlight assets in {:?} ({} syntaxes, {} themes)",
                    started.elapsed(),
                    assets.syntaxes.syntaxes().len(),
                    assets.themes.themes.len()
                );
                Arc::new(assets)
            })
            .await
            .clone()
    }

    /// Cached assets if a load already completed, without triggering one
    pub fn try_get(&self) -> Option<Arc<HighlightAssets>> {
        self.cell.get().cloned()
    }

    /// Number of loads actually performed (0 or 1)
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide loader shared by every code block
static LOADER: AssetLoader = AssetLoader::new();

/// The process-wide loader instance
pub fn global() -> &'static AssetLoader {
    &LOADER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let loader = AssetLoader::new();
        let (a, b, c) = tokio::join!(
            loader.ensure_loaded(),
            loader.ensure_loaded(),
            loader.ensure_loaded()
        );
        assert_eq!(loader.load_count(), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
    }

    #[tokio::test]
    async fn test_try_get_transitions_after_load() {
        let loader = AssetLoader::new();
        assert!(loader.try_get().is_none());
        assert_eq!(loader.load_count(), 0);

        let first = loader.ensure_loaded().await;
        let cached = loader.try_get().expect("assets cached after load");
        assert!(Arc::ptr_eq(&first, &cached));

        let again = loader.ensure_loaded().await;
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(loader.load_count(), 1);
    }

    #[tokio::test]
    async fn test_bundled_assets_cover_defaults() {
        let assets = global().ensure_loaded().await;
        assert!(assets.syntaxes.find_syntax_by_extension("rs").is_some());
        assert!(assets.themes.themes.contains_key("base16-ocean.dark"));
        assert!(assets.themes.themes.contains_key("base16-ocean.light"));
    }
}

// src/images.rs

use crate::models::ProductImage;

/// Katalog, pod którym backend wystawia pliki z dysku `public`.
const STORAGE_PREFIX: &str = "storage";

/// Ustala adres do wyświetlenia obrazka.
///
/// Kolejność:
/// 1. jawny `url` obrazka,
/// 2. `parent_urls[index]` (lista adresów dołączona do produktu),
/// 3. adres zbudowany ze ścieżki w storage.
///
/// Puste stringi traktujemy jak brak wartości. Gdy nic nie pasuje, wynik jest pusty.
pub fn resolve_url(
    image: &ProductImage,
    index: usize,
    parent_urls: &[String],
    storage_base: &str,
) -> String {
    if let Some(url) = non_blank(image.url.as_deref()) {
        return url.to_string();
    }
    if let Some(url) = non_blank(parent_urls.get(index).map(String::as_str)) {
        return url.to_string();
    }
    match non_blank(image.path.as_deref()) {
        Some(path) => storage_url(path, storage_base),
        None => {
            tracing::warn!("Obrazek {} nie ma ani adresu, ani ścieżki", image.id);
            String::new()
        }
    }
}

fn storage_url(path: &str, storage_base: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = storage_base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    // Ścieżka może już zawierać prefiks storage/
    let path = path
        .strip_prefix(STORAGE_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path);
    format!("{}/{}/{}", base, STORAGE_PREFIX, path)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://127.0.0.1:8000/";

    fn image(url: Option<&str>, path: Option<&str>) -> ProductImage {
        ProductImage {
            id: 101,
            url: url.map(str::to_string),
            path: path.map(str::to_string),
        }
    }

    #[test]
    fn explicit_url_wins() {
        let img = image(Some("https://cdn.test/a.jpg"), Some("products/a.jpg"));
        let parents = vec!["https://cdn.test/other.jpg".to_string()];
        assert_eq!(resolve_url(&img, 0, &parents, BASE), "https://cdn.test/a.jpg");
    }

    #[test]
    fn parent_url_by_index_is_second() {
        let img = image(Some("  "), Some("products/a.jpg"));
        let parents = vec!["https://cdn.test/0.jpg".to_string(), "https://cdn.test/1.jpg".to_string()];
        assert_eq!(resolve_url(&img, 1, &parents, BASE), "https://cdn.test/1.jpg");
    }

    #[test]
    fn path_is_joined_with_storage_base() {
        let img = image(None, Some("/products/a.jpg"));
        assert_eq!(
            resolve_url(&img, 3, &[], BASE),
            "http://127.0.0.1:8000/storage/products/a.jpg"
        );
    }

    #[test]
    fn storage_prefix_is_not_doubled() {
        let img = image(None, Some("storage/products/a.jpg"));
        assert_eq!(
            resolve_url(&img, 0, &[], BASE),
            "http://127.0.0.1:8000/storage/products/a.jpg"
        );
    }

    #[test]
    fn absolute_path_is_kept() {
        let img = image(None, Some("https://s3.test/bucket/a.jpg"));
        assert_eq!(resolve_url(&img, 0, &[], BASE), "https://s3.test/bucket/a.jpg");
    }

    #[test]
    fn nothing_known_gives_empty_string() {
        assert_eq!(resolve_url(&image(None, None), 0, &[], BASE), "");
    }
}

// CaseFolio - app/catalog.rs
//
// Loads a case catalog from a TOML or JSON file.
//
// The catalog is the already-resolved case list the portfolio pages hand to
// their interactive components. Problems with individual cases are non-fatal:
// they are logged, collected as warnings, and the offending case (or image)
// is skipped. Only an unreadable or unparseable file is an error.

use crate::core::model::{default_categories, Case, CaseCategory, Category};
use crate::util::constants;
use crate::util::error::CatalogError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of catalog revisions. Every loaded catalog gets a fresh value so
/// memoised gallery views can tell catalogs apart.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Raw catalog file shape.
#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    cases: Vec<Case>,
    #[serde(default)]
    categories: Option<Vec<Category>>,
}

/// Supported catalog encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// The loaded, validated set of cases plus the gallery's category pills.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub cases: Vec<Case>,
    pub categories: Vec<Category>,
    /// File the catalog was read from, if any.
    pub source: Option<PathBuf>,
    revision: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new(), default_categories(), None)
    }
}

impl Catalog {
    pub fn new(cases: Vec<Case>, categories: Vec<Category>, source: Option<PathBuf>) -> Self {
        Self {
            cases,
            categories,
            source,
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Identity of this catalog's contents for memoisation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Index of the case with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.cases.iter().position(|c| c.id == id)
    }
}

/// Read and parse a catalog file.
///
/// Returns the catalog and any non-fatal warnings.
pub fn load_catalog(path: &Path) -> Result<(Catalog, Vec<String>), CatalogError> {
    let format = CatalogFormat::from_path(path).ok_or_else(|| CatalogError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let metadata = std::fs::metadata(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if metadata.len() > constants::MAX_CATALOG_FILE_SIZE {
        return Err(CatalogError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_CATALOG_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let (mut catalog, warnings) = parse_catalog(&content, format, catalog_dir(path), path)?;
    catalog.source = Some(path.to_path_buf());

    tracing::info!(
        path = %path.display(),
        cases = catalog.cases.len(),
        categories = catalog.categories.len(),
        warnings = warnings.len(),
        "Catalog loaded"
    );
    Ok((catalog, warnings))
}

/// Directory relative image paths are resolved against. A bare file name
/// has an empty parent, which means the working directory.
fn catalog_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Parse catalog text and validate its cases.
///
/// Relative image paths are resolved against `base_dir`. `source_path` is
/// used for error messages only (no I/O happens here).
pub fn parse_catalog(
    content: &str,
    format: CatalogFormat,
    base_dir: &Path,
    source_path: &Path,
) -> Result<(Catalog, Vec<String>), CatalogError> {
    let raw: RawCatalog = match format {
        CatalogFormat::Toml => toml::from_str(content).map_err(|e| CatalogError::TomlParse {
            path: source_path.to_path_buf(),
            source: e,
        })?,
        CatalogFormat::Json => {
            serde_json::from_str(content).map_err(|e| CatalogError::JsonParse {
                path: source_path.to_path_buf(),
                source: e,
            })?
        }
    };

    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut cases = Vec::with_capacity(raw.cases.len().min(constants::MAX_CASES));

    for mut case in raw.cases {
        if cases.len() == constants::MAX_CASES {
            let msg = format!(
                "Catalog has more than {} cases; the remainder were not loaded.",
                constants::MAX_CASES
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            break;
        }

        if case.id.is_empty() {
            let msg = format!("Case '{}' has an empty id and was skipped.", case.title);
            tracing::warn!("{}", msg);
            warnings.push(msg);
            continue;
        }

        if !seen_ids.insert(case.id.clone()) {
            let msg = format!("Duplicate case id '{}'; only the first was kept.", case.id);
            tracing::warn!(case_id = %case.id, "Duplicate case id skipped");
            warnings.push(msg);
            continue;
        }

        if case.images.len() > constants::MAX_IMAGES_PER_CASE {
            let msg = format!(
                "Case '{}' has {} images; only the first {} are shown.",
                case.id,
                case.images.len(),
                constants::MAX_IMAGES_PER_CASE
            );
            tracing::warn!(case_id = %case.id, "Image list truncated");
            warnings.push(msg);
            case.images.truncate(constants::MAX_IMAGES_PER_CASE);
        }

        resolve_paths(&mut case, base_dir);
        cases.push(case);
    }

    let categories = match raw.categories {
        Some(categories) => {
            for category in &categories {
                if !category.is_all() && CaseCategory::from_id(&category.id).is_none() {
                    let msg = format!(
                        "Category '{}' matches no known case category; its filter will be empty.",
                        category.id
                    );
                    tracing::warn!(category = %category.id, "Unknown category id");
                    warnings.push(msg);
                }
            }
            categories
        }
        None => default_categories(),
    };

    Ok((Catalog::new(cases, categories, None), warnings))
}

/// Make image and thumbnail paths absolute relative to the catalog directory.
fn resolve_paths(case: &mut Case, base_dir: &Path) {
    for image in &mut case.images {
        if image.src.is_relative() {
            image.src = base_dir.join(&image.src);
        }
    }
    if let Some(thumb) = case.thumbnail.as_mut() {
        if thumb.is_relative() {
            *thumb = base_dir.join(&*thumb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_CATALOG: &str = r#"
[[cases]]
id = "molar-rct"
title = "Lower molar root canal"
category = "endodontics"
date = "2024-02-10"
treatment = "Root canal treatment with warm vertical compaction"
toothNumber = "36"
tags = ["rotary", "MB2"]

[[cases.images]]
src = "molar/pre.jpg"
alt = "Pre-operative radiograph"
stage = "xray"

[[cases.images]]
src = "/abs/molar/post.jpg"
alt = "Post-operative radiograph"
stage = "after"

[[cases]]
id = "wisdom"
title = "Wisdom tooth removal"
category = "extractions"
date = "2024-04-01"
treatment = "Surgical extraction"
thumbnail = "wisdom/card.jpg"

[[cases]]
id = "molar-rct"
title = "Duplicate"
category = "other"
date = "2024-05-01"
treatment = "n/a"
"#;

    fn parse_toml(content: &str) -> Result<(Catalog, Vec<String>), CatalogError> {
        parse_catalog(
            content,
            CatalogFormat::Toml,
            Path::new("/portfolio"),
            Path::new("/portfolio/cases.toml"),
        )
    }

    #[test]
    fn test_parse_resolves_relative_paths() {
        let (catalog, _) = parse_toml(TOML_CATALOG).unwrap();
        let molar = &catalog.cases[0];
        assert_eq!(molar.images[0].src, PathBuf::from("/portfolio/molar/pre.jpg"));
        assert_eq!(molar.images[1].src, PathBuf::from("/abs/molar/post.jpg"));
        assert_eq!(
            catalog.cases[1].thumbnail,
            Some(PathBuf::from("/portfolio/wisdom/card.jpg"))
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let (catalog, warnings) = parse_toml(TOML_CATALOG).unwrap();
        assert_eq!(catalog.cases.len(), 2);
        assert_eq!(catalog.cases[0].title, "Lower molar root canal");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("molar-rct"));
    }

    #[test]
    fn test_missing_categories_use_defaults() {
        let (catalog, _) = parse_toml(TOML_CATALOG).unwrap();
        assert_eq!(catalog.categories, default_categories());
    }

    #[test]
    fn test_custom_categories_warn_on_unknown_ids() {
        let json = r#"{
            "categories": [
                { "id": "all", "name": "All", "icon": "*" },
                { "id": "endodontics", "name": "Endo", "icon": "E" },
                { "id": "orthodontics", "name": "Ortho", "icon": "O" }
            ],
            "cases": []
        }"#;
        let (catalog, warnings) = parse_catalog(
            json,
            CatalogFormat::Json,
            Path::new("."),
            Path::new("cases.json"),
        )
        .unwrap();
        assert_eq!(catalog.categories.len(), 3);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("orthodontics"));
    }

    #[test]
    fn test_invalid_category_is_parse_error() {
        let bad = r#"
[[cases]]
id = "x"
title = "X"
category = "orthodontics"
date = "2024-01-01"
treatment = "Braces"
"#;
        assert!(matches!(parse_toml(bad), Err(CatalogError::TomlParse { .. })));
    }

    #[test]
    fn test_each_catalog_gets_a_new_revision() {
        let a = Catalog::default();
        let b = Catalog::default();
        assert_ne!(a.revision(), b.revision());
    }

    fn json_case(id: &str, images: usize) -> String {
        let images: Vec<String> = (0..images)
            .map(|i| format!(r#"{{ "src": "img/{id}-{i}.jpg" }}"#))
            .collect();
        format!(
            r#"{{ "id": "{id}", "title": "Case {id}", "category": "other",
                "date": "2024-01-01", "treatment": "n/a", "images": [{}] }}"#,
            images.join(",")
        )
    }

    fn parse_json(content: &str) -> Result<(Catalog, Vec<String>), CatalogError> {
        parse_catalog(
            content,
            CatalogFormat::Json,
            Path::new("/portfolio"),
            Path::new("/portfolio/cases.json"),
        )
    }

    #[test]
    fn test_iso_datetime_dates_load() {
        let json = r#"{ "cases": [ {
            "id": "c", "title": "Crown", "category": "fixed-prosthodontics",
            "date": "2024-01-10T00:00:00.000Z", "treatment": "Crown"
        } ] }"#;
        let (catalog, warnings) = parse_json(json).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(catalog.cases.len(), 1);
        assert_eq!(catalog.cases[0].formatted_date(), "Jan 10, 2024");
    }

    #[test]
    fn test_cases_beyond_limit_are_dropped_with_warning() {
        let cases: Vec<String> = (0..constants::MAX_CASES + 3)
            .map(|i| json_case(&format!("case-{i}"), 0))
            .collect();
        let json = format!(r#"{{ "cases": [{}] }}"#, cases.join(","));

        let (catalog, warnings) = parse_json(&json).unwrap();
        assert_eq!(catalog.cases.len(), constants::MAX_CASES);
        assert_eq!(
            catalog.cases.last().map(|c| c.id.clone()),
            Some(format!("case-{}", constants::MAX_CASES - 1))
        );
        assert_eq!(
            warnings,
            vec![format!(
                "Catalog has more than {} cases; the remainder were not loaded.",
                constants::MAX_CASES
            )]
        );
    }

    #[test]
    fn test_exactly_max_cases_loads_without_warning() {
        let cases: Vec<String> = (0..constants::MAX_CASES)
            .map(|i| json_case(&format!("case-{i}"), 0))
            .collect();
        let json = format!(r#"{{ "cases": [{}] }}"#, cases.join(","));

        let (catalog, warnings) = parse_json(&json).unwrap();
        assert_eq!(catalog.cases.len(), constants::MAX_CASES);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_images_beyond_limit_are_truncated_with_warning() {
        let extra = constants::MAX_IMAGES_PER_CASE + 5;
        let json = format!(
            r#"{{ "cases": [{}, {}] }}"#,
            json_case("big", extra),
            json_case("small", 2)
        );

        let (catalog, warnings) = parse_json(&json).unwrap();
        assert_eq!(catalog.cases[0].images.len(), constants::MAX_IMAGES_PER_CASE);
        assert_eq!(
            catalog.cases[0].images.last().map(|i| i.src.clone()),
            Some(PathBuf::from(format!(
                "/portfolio/img/big-{}.jpg",
                constants::MAX_IMAGES_PER_CASE - 1
            )))
        );
        assert_eq!(catalog.cases[1].images.len(), 2);
        assert_eq!(
            warnings,
            vec![format!(
                "Case 'big' has {} images; only the first {} are shown.",
                extra,
                constants::MAX_IMAGES_PER_CASE
            )]
        );
    }

    #[test]
    fn test_empty_id_is_skipped_with_warning() {
        let json = r#"{ "cases": [
            { "id": "", "title": "Nameless", "category": "other",
              "date": "2024-01-01", "treatment": "n/a" },
            { "id": "kept", "title": "Kept", "category": "other",
              "date": "2024-01-01", "treatment": "n/a" }
        ] }"#;
        let (catalog, warnings) = parse_json(json).unwrap();
        assert_eq!(catalog.cases.len(), 1);
        assert_eq!(catalog.cases[0].id, "kept");
        assert_eq!(
            warnings,
            vec!["Case 'Nameless' has an empty id and was skipped.".to_string()]
        );
    }

    #[test]
    fn test_catalog_dir_of_bare_file_name_is_working_dir() {
        assert_eq!(catalog_dir(Path::new("cases.toml")), Path::new("."));
        assert_eq!(catalog_dir(Path::new("site/cases.toml")), Path::new("site"));
        assert_eq!(
            catalog_dir(Path::new("/portfolio/cases.json")),
            Path::new("/portfolio")
        );
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("cases.TOML")),
            Some(CatalogFormat::Toml)
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("cases.json")),
            Some(CatalogFormat::Json)
        );
        assert_eq!(CatalogFormat::from_path(Path::new("cases.yaml")), None);
        assert_eq!(CatalogFormat::from_path(Path::new("cases")), None);
    }
}

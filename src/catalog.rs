//! Question-bank tooling for the admin surface: the tabular import/export
//! formats and the in-memory filtering/sorting behind the question table.

use color_eyre::{eyre::eyre, Result};
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::engine::normalize;
use crate::models::{Question, QuestionType, Verband};

pub const MAX_IMPORT_OPTIONS: usize = 8;
const DEFAULT_CATEGORY: &str = "Allgemein";

pub struct ImportOutcome {
    pub questions: Vec<Question>,
    /// Rows that were present but unusable (no question text, no options,
    /// or no correct answer marked).
    pub skipped: usize,
}

/// Parse a bulk import file. Columns are addressed by header: `Frage`,
/// `Antwort 1..8`, `Antwort N korrekt` (value `richtig`), `Kategorie`,
/// `Fragetyp`. Malformed rows are skipped; the call only fails when no
/// usable row remains.
pub fn parse_import(data: &[u8], verband: Verband) -> Result<ImportOutcome> {
    let text = String::from_utf8_lossy(data);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let frage = column("Frage");
    let kategorie = column("Kategorie");
    let fragetyp = column("Fragetyp");
    let antwort: Vec<Option<usize>> = (1..=MAX_IMPORT_OPTIONS)
        .map(|i| column(&format!("Antwort {i}")))
        .collect();
    let korrekt: Vec<Option<usize>> = (1..=MAX_IMPORT_OPTIONS)
        .map(|i| column(&format!("Antwort {i} korrekt")))
        .collect();

    let mut questions = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("skipping unreadable import row: {e}");
                skipped += 1;
                continue;
            }
        };
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or_default();

        let question_text = normalize(field(frage));
        if question_text.is_empty() {
            skipped += 1;
            continue;
        }

        let mut options = Vec::new();
        let mut correct_answer_indices = Vec::new();
        for i in 0..MAX_IMPORT_OPTIONS {
            let option = field(antwort[i]);
            if option.trim().is_empty() {
                continue;
            }
            if field(korrekt[i]).to_lowercase() == "richtig" {
                correct_answer_indices.push(options.len());
            }
            options.push(normalize(option));
        }

        if options.is_empty() || correct_answer_indices.is_empty() {
            skipped += 1;
            continue;
        }

        let category = normalize(field(kategorie));
        questions.push(Question {
            id: None,
            question_text,
            options,
            correct_answer_indices,
            category: Some(if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category
            }),
            question_type: QuestionType::parse(field(fragetyp)),
            verband: Some(verband),
            image_url: None,
        });
    }

    if questions.is_empty() {
        return Err(eyre!(
            "no questions could be extracted; expected columns like 'Frage', 'Antwort 1', 'Antwort 1 korrekt'"
        ));
    }

    Ok(ImportOutcome { questions, skipped })
}

/// Serialize the catalog in the import column set, so an export can be
/// re-imported unchanged.
pub fn export_csv(questions: &[Question]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Frage".to_string()];
    for i in 1..=MAX_IMPORT_OPTIONS {
        header.push(format!("Antwort {i}"));
        header.push(format!("Antwort {i} korrekt"));
    }
    header.push("Kategorie".to_string());
    header.push("Fragetyp".to_string());
    header.push("Verband".to_string());
    writer.write_record(&header)?;

    for question in questions {
        let mut row = vec![question.question_text.clone()];
        for i in 0..MAX_IMPORT_OPTIONS {
            match question.options.get(i) {
                Some(option) => {
                    row.push(option.clone());
                    row.push(
                        if question.correct_answer_indices.contains(&i) {
                            "richtig"
                        } else {
                            "falsch"
                        }
                        .to_string(),
                    );
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        row.push(question.category.clone().unwrap_or_default());
        row.push(question.question_type.to_string());
        row.push(question.verband.map(|v| v.to_string()).unwrap_or_default());
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| eyre!("could not flush csv writer: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

/// Query parameters of the admin question table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub verband: Option<String>,
    #[serde(default)]
    pub qtype: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub dir: Option<String>,
}

impl QuestionFilter {
    fn wants(value: &Option<String>) -> Option<&str> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != "all")
    }

    pub fn descending(&self) -> bool {
        self.dir.as_deref() == Some("desc")
    }
}

/// Apply search, category, Verband and type filters, then the requested
/// column sort, over the already-fetched list.
pub fn filter_and_sort(questions: &[Question], filter: &QuestionFilter) -> Vec<Question> {
    let search = QuestionFilter::wants(&filter.search).map(str::to_lowercase);
    let category = QuestionFilter::wants(&filter.category);
    let verband = QuestionFilter::wants(&filter.verband);
    let qtype = QuestionFilter::wants(&filter.qtype);

    let mut matched: Vec<Question> = questions
        .iter()
        .filter(|q| {
            if let Some(category) = category {
                if q.category.as_deref() != Some(category) {
                    return false;
                }
            }
            if let Some(verband) = verband {
                if q.verband.map(|v| v.as_str()) != Some(verband) {
                    return false;
                }
            }
            if let Some(qtype) = qtype {
                if q.question_type.as_str() != qtype {
                    return false;
                }
            }
            if let Some(needle) = &search {
                let in_text = q.question_text.to_lowercase().contains(needle);
                let in_options = q.options.iter().any(|o| o.to_lowercase().contains(needle));
                if !in_text && !in_options {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    if let Some(sort) = filter.sort.as_deref() {
        let key = |q: &Question| -> String {
            match sort {
                "type" => q.question_type.as_str().to_lowercase(),
                "category" => q.category.clone().unwrap_or_default().to_lowercase(),
                "verband" => q
                    .verband
                    .map(|v| v.as_str().to_lowercase())
                    .unwrap_or_default(),
                _ => q.question_text.to_lowercase(),
            }
        };
        matched.sort_by_key(key);
        if filter.descending() {
            matched.reverse();
        }
    }

    matched
}

/// Distinct categories of the current bank, for the filter dropdown.
pub fn categories(questions: &[Question]) -> Vec<String> {
    let mut categories: Vec<String> = questions
        .iter()
        .filter_map(|q| q.category.clone())
        .filter(|c| !c.is_empty())
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Frage,Antwort 1,Antwort 1 korrekt,Antwort 2,Antwort 2 korrekt,Antwort 3,Antwort 3 korrekt,Kategorie,Fragetyp
Wie alt muss ein Welpe sein?,8 Wochen,richtig,6 Wochen,falsch,12 Wochen,falsch,Haltung,Single Choice
Welche Pflichten gelten?,Steuer,richtig,Chip,richtig,Keine,falsch,Recht,Multiple Choice
,leer,richtig,,,,,Haltung,Single
Ohne richtige Antwort,a,falsch,b,falsch,,,Haltung,Single
";

    #[test]
    fn parses_rows_and_skips_malformed_ones() {
        let outcome = parse_import(SAMPLE.as_bytes(), Verband::Dzkb).expect("import");
        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(outcome.skipped, 2);

        let first = &outcome.questions[0];
        assert_eq!(first.question_text, "Wie alt muss ein Welpe sein?");
        assert_eq!(first.options.len(), 3);
        assert_eq!(first.correct_answer_indices, vec![0]);
        assert_eq!(first.question_type, QuestionType::Single);
        assert_eq!(first.verband, Some(Verband::Dzkb));

        let second = &outcome.questions[1];
        assert_eq!(second.correct_answer_indices, vec![0, 1]);
        assert_eq!(second.question_type, QuestionType::Multi);
    }

    #[test]
    fn missing_category_defaults() {
        let csv = "Frage,Antwort 1,Antwort 1 korrekt\nF?,ja,richtig\n";
        let outcome = parse_import(csv.as_bytes(), Verband::ProHunde).expect("import");
        assert_eq!(outcome.questions[0].category.as_deref(), Some("Allgemein"));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let csv = "\u{feff}Frage,Antwort 1,Antwort 1 korrekt\nF?,ja,richtig\n";
        let outcome = parse_import(csv.as_bytes(), Verband::Dzkb).expect("import");
        assert_eq!(outcome.questions.len(), 1);
    }

    #[test]
    fn zero_usable_rows_is_an_error() {
        let csv = "Frage,Antwort 1,Antwort 1 korrekt\n,ja,richtig\n";
        assert!(parse_import(csv.as_bytes(), Verband::Dzkb).is_err());
    }

    #[test]
    fn export_round_trips_through_import() {
        let outcome = parse_import(SAMPLE.as_bytes(), Verband::Dzkb).expect("import");
        let exported = export_csv(&outcome.questions).expect("export");
        let reimported = parse_import(exported.as_bytes(), Verband::Dzkb).expect("reimport");

        assert_eq!(reimported.questions.len(), outcome.questions.len());
        assert_eq!(reimported.skipped, 0);
        for (a, b) in outcome.questions.iter().zip(&reimported.questions) {
            assert_eq!(a.question_text, b.question_text);
            assert_eq!(a.options, b.options);
            assert_eq!(a.correct_answer_indices, b.correct_answer_indices);
            assert_eq!(a.question_type, b.question_type);
        }
    }

    fn bank() -> Vec<Question> {
        let outcome = parse_import(SAMPLE.as_bytes(), Verband::Dzkb).expect("import");
        outcome.questions
    }

    #[test]
    fn search_matches_text_and_options() {
        let bank = bank();
        let filter = QuestionFilter {
            search: Some("welpe".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&bank, &filter).len(), 1);

        let filter = QuestionFilter {
            search: Some("chip".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&bank, &filter).len(), 1);
    }

    #[test]
    fn category_and_type_filters_apply() {
        let bank = bank();
        let filter = QuestionFilter {
            category: Some("Recht".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&bank, &filter).len(), 1);

        let filter = QuestionFilter {
            qtype: Some("Single".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&bank, &filter).len(), 1);

        let filter = QuestionFilter {
            category: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&bank, &filter).len(), 2);
    }

    #[test]
    fn sorting_by_category_descending() {
        let bank = bank();
        let filter = QuestionFilter {
            sort: Some("category".to_string()),
            dir: Some("desc".to_string()),
            ..Default::default()
        };
        let sorted = filter_and_sort(&bank, &filter);
        assert_eq!(sorted[0].category.as_deref(), Some("Recht"));
    }

    #[test]
    fn distinct_categories_sorted() {
        let bank = bank();
        assert_eq!(categories(&bank), vec!["Haltung", "Recht"]);
    }
}

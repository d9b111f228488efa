#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Settings and generations describing one synthetic run directory.
pub struct RunSpec {
    pub name: String,
    pub selection: u32,
    pub max_gen: u64,
    pub pop_size: u64,
    pub objective_cnt: u64,
    pub gens: Vec<u64>,
    pub extra_settings: Vec<(String, String)>,
}

impl RunSpec {
    pub fn new(name: &str, gens: impl IntoIterator<Item = u64>) -> Self {
        let gens: Vec<u64> = gens.into_iter().collect();
        Self {
            name: name.to_string(),
            selection: 1,
            max_gen: gens.last().copied().unwrap_or(0),
            pop_size: 10,
            objective_cnt: 4,
            gens,
            extra_settings: Vec::new(),
        }
    }

    pub fn selection(mut self, code: u32) -> Self {
        self.selection = code;
        self
    }

    pub fn max_gen(mut self, max_gen: u64) -> Self {
        self.max_gen = max_gen;
        self
    }

    pub fn setting(mut self, key: &str, value: &str) -> Self {
        self.extra_settings.push((key.to_string(), value.to_string()));
        self
    }
}

fn quoted(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| format!("\"{field}\""))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes a CSV with a bare header and fully quoted data lines.
pub fn write_csv(path: &Path, header: &str, rows: &[Vec<String>]) {
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(&quoted(row));
        content.push('\n');
    }
    fs::write(path, content).expect("write fixture csv");
}

/// Creates `root/<spec.name>` with a configuration file and the three
/// default metric sources.
pub fn write_run(root: &Path, spec: &RunSpec) -> PathBuf {
    let dir = root.join(&spec.name);
    fs::create_dir_all(&dir).expect("create run dir");

    let mut settings = vec![
        vec!["SELECTION".to_string(), spec.selection.to_string()],
        vec!["MAX_GENS".to_string(), spec.max_gen.to_string()],
        vec!["POP_SIZE".to_string(), spec.pop_size.to_string()],
        vec!["OBJECTIVE_CNT".to_string(), spec.objective_cnt.to_string()],
        vec!["SEED".to_string(), spec.name.rsplit('_').next().unwrap_or("0").to_string()],
        vec!["DSLEX_PROP".to_string(), "0.5".to_string()],
        vec!["COH_LEX_PROP".to_string(), "0.25".to_string()],
        vec!["MU".to_string(), "0.1".to_string()],
    ];
    for (key, value) in &spec.extra_settings {
        settings.push(vec![key.clone(), value.clone()]);
    }
    write_csv(&dir.join("run_config.csv"), "parameter,value", &settings);

    let data: Vec<Vec<String>> = spec
        .gens
        .iter()
        .map(|gen| vec![gen.to_string(), (gen * 2).to_string()])
        .collect();
    write_csv(&dir.join("data.csv"), "update,max_fitness", &data);

    let phylo: Vec<Vec<String>> = spec
        .gens
        .iter()
        .map(|gen| vec![gen.to_string(), format!("{}.5", gen)])
        .collect();
    write_csv(&dir.join("phylodiversity.csv"), "update,mrca_depth", &phylo);

    let phen: Vec<Vec<String>> = spec
        .gens
        .iter()
        .map(|gen| vec![gen.to_string(), (gen + 1).to_string()])
        .collect();
    write_csv(
        &dir.join("phenotype_systematics.csv"),
        "generation,richness",
        &phen,
    );
    dir
}

/// Header produced by runs written with [`write_run`] and default exclusions.
pub fn standard_header() -> Vec<String> {
    [
        "MAX_GENS",
        "OBJECTIVE_CNT",
        "POP_SIZE",
        "SEED",
        "SELECTION",
        "directory",
        "evaluations",
        "gen",
        "max_fitness",
        "mrca_depth",
        "phen_richness",
        "selection_name",
        "test_sample_prop",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Reads an aggregate CSV back as a header plus rows.
pub fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("open output");
    let header = reader
        .headers()
        .expect("header")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("record")
                .iter()
                .map(String::from)
                .collect()
        })
        .collect();
    (header, rows)
}

/// Looks up `field` in `row` using the column positions of `header`.
pub fn cell<'a>(header: &[String], row: &'a [String], field: &str) -> &'a str {
    let idx = header
        .iter()
        .position(|name| name == field)
        .unwrap_or_else(|| panic!("missing column {field}"));
    &row[idx]
}

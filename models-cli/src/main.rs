use clap::{Parser, Subcommand, ValueEnum};
use models::{parse_model, parse_model_str, set_default_types, write_model, Element, Model};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;

/// modelgen: create, check, render and validate record models
#[derive(Parser)]
#[command(name = "modelgen", version, about)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "yaml")]
    format: OutputFormat,

    /// Log debug detail to stderr (otherwise RUST_LOG applies)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Html,
    #[value(alias = "sqlite3")]
    Sqlite,
    Typescript,
    Python,
}

impl Target {
    fn renderer(self) -> &'static str {
        match self {
            Target::Html => "html",
            Target::Sqlite => "sqlite",
            Target::Typescript => "typescript",
            Target::Python => "python",
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Create a new model file
    New {
        /// Model file to create (.yaml or .json)
        file: PathBuf,
        /// Model id (default: the file name without extension)
        #[arg(long)]
        id: Option<String>,
    },

    /// Check a model file for structural problems
    Check {
        /// Model file
        file: PathBuf,
    },

    /// Render a model as HTML, SQLite, TypeScript or Python
    Render {
        /// Output language
        target: Target,
        /// Model file (default: read YAML from stdin)
        model: Option<PathBuf>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the default element types
    Types,

    /// Add an element to a model file
    AddElement {
        /// Model file
        file: PathBuf,
        /// Element id
        id: String,
        /// Element type
        #[arg(long = "type", default_value = "text")]
        element_type: String,
        /// Label (default: the capitalized id)
        #[arg(long)]
        label: Option<String>,
        /// Position in the element list (default: last)
        #[arg(long)]
        position: Option<usize>,
        /// Make this element the object identifier
        #[arg(long)]
        primary: bool,
        /// Extra attributes (e.g. --attr placeholder="Jane Doe")
        #[arg(long = "attr", value_parser = parse_key_value)]
        attributes: Vec<(String, String)>,
    },

    /// Remove an element from a model file
    RemoveElement {
        /// Model file
        file: PathBuf,
        /// Element id
        id: String,
    },

    /// Validate a record (JSON or YAML object) against a model
    Validate {
        /// Model file
        model: PathBuf,
        /// Record file
        record: PathBuf,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("Invalid key=value pair: no '=' found in '{s}'"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::New { file, id } => {
            if file.exists() {
                return Err(format!("{} already exists", file.display()).into());
            }
            let model_id = match id {
                Some(id) => id,
                None => default_model_id(&file)?,
            };
            let model = Model::new(&model_id)?;
            write_model(&file, &model)?;
            log::info!("created model {model_id:?} in {}", file.display());
            print_output(
                &serde_json::json!({ "ok": true, "model": model_id, "file": file }),
                &cli.format,
            );
        }

        Command::Check { file } => {
            let model = parse_model(&file)?;
            let mut diagnostics = Vec::new();
            let ok = model.check(&mut diagnostics);
            print_output(
                &serde_json::json!({ "ok": ok, "model": model.id, "diagnostics": diagnostics }),
                &cli.format,
            );
            if !ok {
                return Err(format!("model {:?} failed check", model.id).into());
            }
        }

        Command::Render {
            target,
            model,
            output,
        } => {
            let mut model = match model {
                Some(path) => parse_model(&path)?,
                None => {
                    let mut content = String::new();
                    std::io::stdin().read_to_string(&mut content)?;
                    parse_model_str(&content)?
                }
            };
            model.ensure_valid()?;
            models_codegen::register_renderers(&mut model);

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(std::fs::File::create(path)?),
                None => Box::new(std::io::stdout().lock()),
            };
            model.render(&mut *out, target.renderer())?;
            out.flush()?;
        }

        Command::Types => {
            let mut model = Model::new("types")?;
            set_default_types(&mut model);
            print_output(
                &serde_json::json!(model.types().type_names()),
                &cli.format,
            );
        }

        Command::AddElement {
            file,
            id,
            element_type,
            label,
            position,
            primary,
            attributes,
        } => {
            let mut model = parse_model(&file)?;
            set_default_types(&mut model);
            let elem = build_element(&model, &id, &element_type, label, primary, &attributes)?;
            if primary {
                // only one object identifier per model
                let current = model.get_primary_id();
                if let Some(prev) = model.get_element_mut(&current) {
                    prev.set_object_id(false);
                }
            }
            model.insert_element(position.unwrap_or(usize::MAX), elem)?;
            model.ensure_valid()?;
            if model.has_changes() {
                write_model(&file, &model)?;
            }
            print_output(
                &serde_json::json!({ "ok": true, "model": model.id, "elements": model.get_element_ids() }),
                &cli.format,
            );
        }

        Command::RemoveElement { file, id } => {
            let mut model = parse_model(&file)?;
            model.remove_element(&id)?;
            write_model(&file, &model)?;
            print_output(
                &serde_json::json!({ "ok": true, "model": model.id, "elements": model.get_element_ids() }),
                &cli.format,
            );
        }

        Command::Validate { model, record } => {
            let mut model = parse_model(&model)?;
            model.ensure_valid()?;
            set_default_types(&mut model);
            let values = read_record(&record)?;
            let report = model.validation_report_map_interface(&values);
            print_output(
                &serde_json::json!({ "valid": report.is_ok(), "errors": report.errors }),
                &cli.format,
            );
            if !report.is_ok() {
                return Err(format!(
                    "{} is not a valid {} record",
                    record.display(),
                    model.id
                )
                .into());
            }
        }
    }

    Ok(())
}

/// Lower-cased file name without its extension.
fn default_model_id(file: &Path) -> Result<String, Box<dyn std::error::Error>> {
    file.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| format!("can't derive a model id from {}", file.display()).into())
}

/// Generate an element of `element_type` from the model's registry and
/// give it an id, name and label.
fn build_element(
    model: &Model,
    id: &str,
    element_type: &str,
    label: Option<String>,
    primary: bool,
    attributes: &[(String, String)],
) -> Result<Element, Box<dyn std::error::Error>> {
    let defaults = Element::new(id)?;
    let mut elem = model
        .gen_element_type(element_type)
        .ok_or_else(|| format!("{element_type:?} is not a supported element type"))?;
    elem.id = defaults.id;
    elem.set_attribute("name", id);
    elem.set_label(label.as_deref().unwrap_or(&defaults.label));
    elem.set_object_id(primary);
    for (key, value) in attributes {
        elem.set_attribute(key, value);
    }
    Ok(elem)
}

/// Read a record file as a JSON object (`.json`) or YAML mapping.
fn read_record(
    path: &Path,
) -> Result<serde_json::Map<String, serde_json::Value>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read record file '{}': {e}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value: serde_json::Value = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(format!("{} does not hold a mapping of element ids to values", path.display()).into()),
    }
}

fn print_output(value: &serde_json::Value, format: &OutputFormat) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).map(|s| s + "\n").map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
    };
    match rendered {
        Ok(text) => print!("{text}"),
        Err(e) => eprintln!("ERROR:{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("placeholder=Jane=Doe").unwrap(),
            ("placeholder".to_string(), "Jane=Doe".to_string())
        );
        assert!(parse_key_value("placeholder").is_err());
    }

    #[test]
    fn test_default_model_id() {
        assert_eq!(
            default_model_id(Path::new("models/People.yaml")).unwrap(),
            "people"
        );
    }

    #[test]
    fn test_build_element() {
        let mut model = Model::new("people").unwrap();
        set_default_types(&mut model);
        let attrs = vec![("placeholder".to_string(), "0000-0000-0000-0000".to_string())];
        let elem = build_element(&model, "orcid", "orcid", None, false, &attrs).unwrap();
        assert_eq!(elem.id, "orcid");
        assert_eq!(elem.element_type, "orcid");
        assert_eq!(elem.label, "Orcid");
        assert_eq!(elem.attributes["name"], "orcid");
        assert_eq!(elem.attributes["placeholder"], "0000-0000-0000-0000");
        assert!(!elem.pattern.is_empty());

        assert!(build_element(&model, "shape", "hologram", None, false, &[]).is_err());
        assert!(build_element(&model, "bad-id", "text", None, false, &[]).is_err());
    }

    #[test]
    fn test_read_record() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("record.json");
        std::fs::write(&json, r#"{"id": "abc", "count": 3}"#).unwrap();
        let map = read_record(&json).unwrap();
        assert_eq!(map["count"], serde_json::json!(3));

        let yaml = dir.path().join("record.yaml");
        std::fs::write(&yaml, "id: abc\ncount: 3\nactive: true\n").unwrap();
        let map = read_record(&yaml).unwrap();
        assert_eq!(map["active"], serde_json::json!(true));

        let list = dir.path().join("list.yaml");
        std::fs::write(&list, "- a\n- b\n").unwrap();
        assert!(read_record(&list).is_err());
    }
}

use cucumber::{given, then, when, World};
use recast_common::config::RecastConfig;
use recast_common::render::Renderer;
use recast_core::model::{ConstructorCandidate, Parameter, PropertyDescriptor, RecordDefinition};
use recast_core::{
    ConversionRegistry, GeneratedMapping, GeneratorOptions, MappingDeclaration, MappingEntry,
    MappingError, MappingGenerator, TypeCatalog, TypeDescriptor,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Default, World)]
pub struct TestWorld {
    catalog: TypeCatalog,
    enums: BTreeMap<String, Vec<String>>,
    options: GeneratorOptions,
    entries: Vec<MappingEntry>,
    result: Option<Result<GeneratedMapping, MappingError>>,
    config_path: PathBuf,
    temp_dir: Option<tempfile::TempDir>,
    loaded_config: Option<RecastConfig>,
}

impl TestWorld {
    /// `String`, `Int?`, an enum declared earlier, or any other name as a record.
    fn parse_type(&self, text: &str) -> TypeDescriptor {
        let (name, nullable) = match text.strip_suffix('?') {
            Some(name) => (name, true),
            None => (text, false),
        };
        let tpe = if let Some(variants) = self.enums.get(name) {
            TypeDescriptor::enumeration(name, variants.clone())
        } else if name.contains('.') {
            TypeDescriptor::record(name)
        } else {
            TypeDescriptor::scalar(name)
        };
        if nullable { tpe.nullable() } else { tpe }
    }

    /// `"id: String, age: Int"` as name/type pairs
    fn parse_fields(&self, text: &str) -> Vec<(String, TypeDescriptor)> {
        text.split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| {
                let (name, tpe) = field.split_once(':').expect("field as `name: Type`");
                (name.trim().to_string(), self.parse_type(tpe.trim()))
            })
            .collect()
    }

    fn constructor(&self, text: &str) -> ConstructorCandidate {
        ConstructorCandidate::new(
            self.parse_fields(text)
                .into_iter()
                .map(|(name, tpe)| Parameter::new(name, tpe))
                .collect(),
        )
    }

    fn mapping(&self) -> &GeneratedMapping {
        match self.result.as_ref().expect("No mapping generated") {
            Ok(mapping) => mapping,
            Err(err) => panic!("Expected success, got {err}"),
        }
    }

    fn error(&self) -> &MappingError {
        match self.result.as_ref().expect("No mapping generated") {
            Ok(_) => panic!("Expected the mapping to fail"),
            Err(err) => err,
        }
    }
}

// Type model steps

#[given(expr = "an enum {string} with variants {string}")]
async fn an_enum(w: &mut TestWorld, name: String, variants: String) {
    let variants = variants.split(',').map(|v| v.trim().to_string()).collect();
    w.enums.insert(name, variants);
}

#[given(expr = "a data record {string} with {string}")]
async fn a_data_record(w: &mut TestWorld, name: String, fields: String) {
    let fields = w.parse_fields(&fields);
    w.catalog.insert(RecordDefinition::data(name.as_str(), fields));
}

#[given(expr = "a record {string} with constructor {string} and mutable properties {string}")]
async fn a_record_with_setters(w: &mut TestWorld, name: String, params: String, mutable: String) {
    let mut record = RecordDefinition::new(name.as_str());
    for (field, tpe) in w.parse_fields(&params) {
        record = record.property(PropertyDescriptor::new(field, tpe));
    }
    for (field, tpe) in w.parse_fields(&mutable) {
        record = record.property(PropertyDescriptor::new(field, tpe).mutable());
    }
    record = record.constructor(w.constructor(&params));
    w.catalog.insert(record);
}

#[given(expr = "a record {string} with mutable properties {string} and constructors {string} and {string}")]
async fn a_record_with_two_constructors(
    w: &mut TestWorld,
    name: String,
    mutable: String,
    first: String,
    second: String,
) {
    let mut record = RecordDefinition::new(name.as_str());
    for (field, tpe) in w.parse_fields(&mutable) {
        record = record.property(PropertyDescriptor::new(field, tpe).mutable());
    }
    record = record
        .constructor(w.constructor(&first))
        .constructor(w.constructor(&second));
    w.catalog.insert(record);
}

// Declaration steps

#[given(expr = "not-null enforcement is enabled")]
async fn enforcement_enabled(w: &mut TestWorld) {
    w.options = w.options.clone().with_enforce_not_null(true);
}

#[given(expr = "the field {string} is mapped from {string}")]
async fn field_mapped(w: &mut TestWorld, target: String, source: String) {
    w.entries.push(MappingEntry::rename(target, source));
}

#[given(expr = "the field {string} is mapped from {string} enabling {string}")]
async fn field_mapped_enabling(w: &mut TestWorld, target: String, source: String, rule: String) {
    w.entries.push(MappingEntry::rename(target, source).enable(rule));
}

#[when(expr = "I generate a mapping from {string} to {string}")]
async fn generate(w: &mut TestWorld, source: String, target: String) {
    let mut declaration = MappingDeclaration::new(w.parse_type(&source), w.parse_type(&target));
    declaration.entries = w.entries.clone();

    let registry = ConversionRegistry::with_defaults();
    let generator = MappingGenerator::new(&w.catalog, &registry, &w.options);
    w.result = Some(generator.generate(&declaration));
}

#[then(expr = "the mapping succeeds")]
async fn mapping_succeeds(w: &mut TestWorld) {
    w.mapping();
}

#[then(expr = "the mapping fails with {string}")]
async fn mapping_fails_with(w: &mut TestWorld, kind: String) {
    assert_eq!(w.error().kind().to_string(), kind);
}

#[then(expr = "the failing field is {string}")]
async fn failing_field(w: &mut TestWorld, field: String) {
    match w.error() {
        MappingError::Field { field: actual, .. } => assert_eq!(actual, &field),
        other => panic!("Expected a field error, got {other:?}"),
    }
}

#[then(expr = "the failure names the missing variant {string}")]
async fn failure_names_variant(w: &mut TestWorld, variant: String) {
    match w.error().root() {
        MappingError::MissingEnumValue { missing, .. } => assert_eq!(missing, &vec![variant]),
        other => panic!("Expected a missing enum value, got {other:?}"),
    }
}

#[then(expr = "the constructor receives {string}")]
async fn constructor_receives(w: &mut TestWorld, names: String) {
    let expected: Vec<String> = names.split(',').map(|n| n.trim().to_string()).collect();
    let actual: Vec<String> = w
        .mapping()
        .plan
        .constructor_assignments
        .iter()
        .map(|a| a.target.clone())
        .collect();
    assert_eq!(actual, expected);
}

#[then(expr = "{string} is assigned after construction")]
async fn assigned_after_construction(w: &mut TestWorld, name: String) {
    let post = &w.mapping().plan.post_construction_assignments;
    assert!(
        post.iter().any(|p| p.assignment.target == name),
        "{name} not among post-construction assignments"
    );
}

#[then(expr = "the rendered code contains {string}")]
async fn rendered_contains(w: &mut TestWorld, snippet: String) {
    let text = Renderer::default()
        .render_function(&w.mapping().function)
        .expect("render");
    assert!(text.contains(&snippet), "{snippet:?} not in:\n{text}");
}

// Configuration steps

#[given(expr = "I have a {string} file with:")]
async fn i_have_a_config_file_with(
    w: &mut TestWorld,
    filename: String,
    step: &cucumber::gherkin::Step,
) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join(&filename);
    let content = step.docstring.as_ref().expect("Docstring required").clone();
    std::fs::write(&file_path, content).expect("Failed to write config file");
    w.config_path = file_path;
    w.temp_dir = Some(dir);
}

#[when(expr = "I load the configuration")]
async fn i_load_configuration(w: &mut TestWorld) {
    let config = RecastConfig::load(&w.config_path).expect("Failed to load configuration");
    w.options = config.generator_options();
    w.loaded_config = Some(config);
}

#[then(expr = "rule {string} is registered at priority {int}")]
async fn rule_registered(w: &mut TestWorld, id: String, priority: i32) {
    let config = w.loaded_config.as_ref().expect("Config not loaded");
    let registry = config.registry().expect("Invalid rules");
    let rule = registry
        .rules()
        .find(|r| r.id.as_str() == id)
        .unwrap_or_else(|| panic!("Rule {id} not registered"));
    assert_eq!(rule.priority, priority);
}

#[then(expr = "the output directory should be {string}")]
async fn output_directory(w: &mut TestWorld, directory: String) {
    let config = w.loaded_config.as_ref().expect("Config not loaded");
    assert_eq!(config.output.directory, PathBuf::from(directory));
}

#[tokio::main]
async fn main() {
    TestWorld::run("tests/features").await;
}

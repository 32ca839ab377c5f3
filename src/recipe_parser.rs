//! Turns free-form oracle output into recipe fields.
//!
//! Two encodings are understood. A JSON object (possibly wrapped in prose or a
//! markdown fence) is tried first; anything else is read line by line as
//! `Title:` / `Category:` / `Ingredients:` / `Instructions:` labeled text.
//! Parsing never fails: fields that cannot be recovered are left as `None` and
//! filled in later by [`RecipeFields::into_recipe`].

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::categories::{Category, DEFAULT_CATEGORY_LABEL};
use crate::recipe::Recipe;

pub const MISSING_INGREDIENTS_PLACEHOLDER: &str = "See recipe description";
pub const MISSING_INSTRUCTIONS_PLACEHOLDER: &str = "Follow standard cooking steps.";

/// Fields recovered from one oracle reply, before any defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFields {
    pub title: Option<String>,
    pub category: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
}

/// Values substituted for fields the parser could not recover.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefaults<'a> {
    pub fallback_title: &'a str,
    /// The caller's own ingredient list, preferred over the generic placeholder.
    pub original_ingredients: &'a [String],
    pub category_label: &'a str,
}

impl RecipeFields {
    pub fn recovered_any(&self) -> bool {
        self.title.is_some()
            || self.category.is_some()
            || self.ingredients.is_some()
            || self.instructions.is_some()
    }

    /// A reply with neither a title nor instructions is not a recipe, whatever
    /// else was scraped from it.
    pub fn is_usable(&self) -> bool {
        self.title.is_some() || self.instructions.is_some()
    }

    pub fn into_recipe(self, defaults: &FieldDefaults<'_>) -> Recipe {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| defaults.fallback_title.to_string());

        let category = match self.category {
            Some(raw) => Category::parse(&raw)
                .map(|c| c.display_label())
                .unwrap_or(DEFAULT_CATEGORY_LABEL)
                .to_string(),
            None => defaults.category_label.to_string(),
        };

        let ingredients = match self.ingredients.filter(|list| !list.is_empty()) {
            Some(list) => list,
            None if !defaults.original_ingredients.is_empty() => {
                defaults.original_ingredients.to_vec()
            }
            None => vec![MISSING_INGREDIENTS_PLACEHOLDER.to_string()],
        };

        let instructions = self
            .instructions
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| MISSING_INSTRUCTIONS_PLACEHOLDER.to_string());

        Recipe {
            title,
            category,
            ingredients,
            instructions,
        }
    }
}

pub fn parse_recipe_output(raw_text: &str) -> RecipeFields {
    let cleaned = clean_raw_text(raw_text);

    if let Some(fields) = parse_structured(&cleaned) {
        debug!("Recovered recipe fields from a JSON envelope");
        return fields;
    }

    let fields = parse_labeled_lines(&cleaned);
    debug!(
        title = fields.title.is_some(),
        ingredients = fields.ingredients.is_some(),
        instructions = fields.instructions.is_some(),
        "Recovered recipe fields from labeled text"
    );
    fields
}

fn clean_raw_text(raw_text: &str) -> String {
    let mut text = raw_text.trim();

    // Markdown fences, with or without a language tag on the opening line.
    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(newline) => &text[newline + 1..],
            None => text.trim_start_matches('`'),
        };
        text = text.trim_end().trim_end_matches("```").trim();
    }

    text.replace("TitleTitle", "Title")
        .replace("IngredientsIngredients", "Ingredients")
        .replace("InstructionsInstructions", "Instructions")
}

fn normalize_category(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c: char| c == '*' || c == '"').trim();
    if trimmed.is_empty() {
        return None;
    }
    match Category::parse(trimmed) {
        Some(_) => Some(trimmed.to_string()),
        None => {
            debug!(category = trimmed, "Unknown category in oracle output, using default");
            Some(DEFAULT_CATEGORY_LABEL.to_string())
        }
    }
}

fn split_ingredient_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

const TITLE_KEYS: &[&str] = &["title", "recipe_title", "name"];
const CATEGORY_KEYS: &[&str] = &["category"];
const INGREDIENT_KEYS: &[&str] = &["ingredients"];
const INSTRUCTION_KEYS: &[&str] = &["instructions", "steps", "directions", "method"];

/// Keys read from the text of an ingredient or step given as an object.
const ITEM_TEXT_KEYS: &[&str] = &["name", "item", "ingredient", "text", "step", "instruction"];

fn first_field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn has_recipe_field(object: &Map<String, Value>) -> bool {
    [TITLE_KEYS, CATEGORY_KEYS, INGREDIENT_KEYS, INSTRUCTION_KEYS]
        .iter()
        .any(|keys| first_field(object, keys).is_some())
}

/// The object holding the recipe: the top level itself, the only nested object
/// that looks like a recipe (`{"recipe": {...}}`), or the first element of a
/// top-level array.
fn recipe_object(value: &Value) -> Option<&Map<String, Value>> {
    if let Value::Array(items) = value {
        return items.first().and_then(recipe_object);
    }

    let object = value.as_object()?;
    if has_recipe_field(object) {
        return Some(object);
    }

    let mut nested = object
        .values()
        .filter_map(Value::as_object)
        .filter(|inner| has_recipe_field(inner));
    match (nested.next(), nested.next()) {
        (Some(inner), None) => Some(inner),
        _ => None,
    }
}

/// Strings are trimmed, numbers and booleans are written out, anything else is
/// dropped.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn item_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(object) => first_field(object, ITEM_TEXT_KEYS).and_then(scalar_text),
        other => scalar_text(other),
    }
}

fn ingredients_from(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(item_text).collect(),
        Value::String(text) => split_ingredient_list(text),
        other => item_text(other).into_iter().collect(),
    };
    (!items.is_empty()).then_some(items)
}

fn instructions_from(value: &Value) -> Option<String> {
    let text = match value {
        Value::Array(steps) => steps.iter().filter_map(item_text).collect::<Vec<_>>().join("\n"),
        other => item_text(other)?,
    };
    (!text.is_empty()).then_some(text)
}

/// Each field is read on its own, so one oddly shaped value costs only that field.
fn fields_from_object(object: &Map<String, Value>) -> RecipeFields {
    RecipeFields {
        title: first_field(object, TITLE_KEYS).and_then(scalar_text),
        category: first_field(object, CATEGORY_KEYS)
            .and_then(Value::as_str)
            .and_then(normalize_category),
        ingredients: first_field(object, INGREDIENT_KEYS).and_then(ingredients_from),
        instructions: first_field(object, INSTRUCTION_KEYS).and_then(instructions_from),
    }
}

fn try_envelope(candidate: &str) -> Option<RecipeFields> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let fields = fields_from_object(recipe_object(&value)?);
    fields.recovered_any().then_some(fields)
}

/// Whole text first, then the span between the first `{` and the last `}`.
fn parse_structured(text: &str) -> Option<RecipeFields> {
    if let Some(fields) = try_envelope(text) {
        return Some(fields);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    trace!(start, end, "Retrying JSON parse on embedded object");
    try_envelope(&text[start..=end])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Title,
    Category,
    Ingredients,
    Instructions,
}

const LABELS: &[(&str, Section)] = &[
    ("title", Section::Title),
    ("category", Section::Category),
    ("ingredients", Section::Ingredients),
    ("instructions", Section::Instructions),
];

/// Recognizes a label at the start of a line: `Title: ...`, `**Title:** ...`,
/// or a bare heading such as `## Ingredients`. Returns the section and whatever
/// follows the label on the same line.
fn leading_label(line: &str) -> Option<(Section, &str)> {
    let stripped = line
        .trim_start_matches(|c: char| c == '#' || c == '*')
        .trim_start();
    let lower = stripped.to_ascii_lowercase();

    for (name, section) in LABELS {
        if !lower.starts_with(name) {
            continue;
        }
        let rest = stripped[name.len()..].trim_start_matches('*').trim_start();
        if let Some(after_colon) = rest.strip_prefix(':') {
            let content = after_colon.trim_start_matches('*').trim();
            return Some((*section, content));
        }
        if rest.is_empty() {
            return Some((*section, ""));
        }
    }
    None
}

/// Finds the earliest `Label:` inside `content` that starts with a capital letter
/// and follows whitespace, which is how a second field shows up when the oracle
/// runs two fields together on one line. Markdown bold around the label
/// (`**Instructions:**`) is included in the returned span.
fn find_embedded_label(content: &str) -> Option<(usize, usize, Section)> {
    let lower = content.to_ascii_lowercase();
    let bytes = content.as_bytes();

    LABELS
        .iter()
        .filter_map(|(name, section)| {
            let needle = format!("{}:", name);
            lower.match_indices(&needle).find_map(|(idx, _)| {
                let mut start = idx;
                while start > 0 && bytes[start - 1] == b'*' {
                    start -= 1;
                }
                let mut end = idx + needle.len();
                while end < bytes.len() && bytes[end] == b'*' {
                    end += 1;
                }

                let starts_capitalized = bytes[idx].is_ascii_uppercase();
                let after_whitespace = start > 0 && bytes[start - 1].is_ascii_whitespace();
                (starts_capitalized && after_whitespace).then_some((start, end, *section))
            })
        })
        .min_by_key(|(start, _, _)| *start)
}

fn strip_list_marker(line: &str) -> Option<&str> {
    let bulleted = line.trim_start_matches(|c: char| c == '-' || c == '*' || c == '•');
    if bulleted.len() != line.len() {
        return Some(bulleted.trim());
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(item) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return Some(item.trim());
        }
    }
    None
}

#[derive(Debug)]
struct LabeledTextState {
    section: Section,
    title: Option<String>,
    category: Option<String>,
    ingredients: Vec<String>,
    instruction_lines: Vec<String>,
}

impl LabeledTextState {
    fn new() -> Self {
        Self {
            section: Section::None,
            title: None,
            category: None,
            ingredients: Vec::new(),
            instruction_lines: Vec::new(),
        }
    }

    fn enter(&mut self, section: Section, content: &str) {
        self.section = section;
        self.push(content);
    }

    fn push(&mut self, content: &str) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }

        match self.section {
            Section::None => trace!(line = content, "Skipping text outside any section"),
            Section::Title => {
                if self.title.is_none() {
                    let title = content.trim_matches(|c: char| c == '*' || c == '"').trim();
                    if !title.is_empty() {
                        self.title = Some(title.to_string());
                    }
                }
            }
            Section::Category => {
                if self.category.is_none() {
                    self.category = normalize_category(content);
                }
            }
            Section::Ingredients => {
                let items = match strip_list_marker(content) {
                    Some(item) if !item.is_empty() => vec![item.to_string()],
                    Some(_) => Vec::new(),
                    None => split_ingredient_list(content),
                };
                for item in items {
                    let seen = self
                        .ingredients
                        .iter()
                        .any(|existing| existing.eq_ignore_ascii_case(&item));
                    if !seen {
                        self.ingredients.push(item);
                    }
                }
            }
            Section::Instructions => {
                if !self.instruction_lines.iter().any(|existing| existing == content) {
                    self.instruction_lines.push(content.to_string());
                }
            }
        }
    }

    fn finish(self) -> RecipeFields {
        RecipeFields {
            title: self.title,
            category: self.category,
            ingredients: (!self.ingredients.is_empty()).then_some(self.ingredients),
            instructions: (!self.instruction_lines.is_empty())
                .then(|| self.instruction_lines.join("\n")),
        }
    }
}

fn parse_labeled_lines(text: &str) -> RecipeFields {
    let mut state = LabeledTextState::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (mut current, mut content) = match leading_label(line) {
            Some(found) => found,
            // Preamble such as "Here you go. Title: Soup" before any section opened.
            None if state.section == Section::None => match find_embedded_label(line) {
                Some((label_start, content_start, section)) => {
                    state.push(&line[..label_start]);
                    (section, &line[content_start..])
                }
                None => {
                    state.push(line);
                    continue;
                }
            },
            None => {
                state.push(line);
                continue;
            }
        };

        while let Some((label_start, content_start, next)) = find_embedded_label(content) {
            trace!(?current, ?next, "Splitting line with two labels");
            state.enter(current, &content[..label_start]);
            current = next;
            content = &content[content_start..];
        }
        state.enter(current, content);
    }

    state.finish()
}

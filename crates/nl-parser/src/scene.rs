use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use nl_core::DiagnosticKind;
use regex::Regex;

pub const ROOT_SENTINEL: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    /// No `parent` attribute on the declaration.
    Absent,
    /// `parent="."`
    Root,
    /// `parent="Path/To/Node"`
    Node(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub name: String,
    pub kind: Option<String>,
    pub parent: ParentRef,
    pub script: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedScene {
    pub records: Vec<NodeRecord>,
    pub issues: Vec<ParseIssue>,
}

impl ParsedScene {
    /// Script attached to the first declared node.
    pub fn root_script(&self) -> Option<&str> {
        self.records
            .first()
            .and_then(|record| record.script.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
}

struct PendingRecord {
    record: NodeRecord,
    script_id: Option<String>,
}

pub fn parse_scene(source: &str) -> ParsedScene {
    let mut pending: Vec<PendingRecord> = Vec::new();
    let mut ext_resources: HashMap<String, String> = HashMap::new();
    let mut issues = Vec::new();
    let mut current_node: Option<usize> = None;
    // Set while a property value's quoted string spans several lines.
    let mut open_string = false;

    for (index, raw_line) in source.lines().enumerate() {
        let line_number = index + 1;
        if open_string {
            open_string = string_open_after(raw_line, true);
            continue;
        }
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        match parse_section_header(line) {
            Ok(Some(header)) => {
                current_node = None;
                match header.tag.as_str() {
                    "node" => match node_record(&header, line_number) {
                        Ok(record) => {
                            pending.push(PendingRecord {
                                record,
                                script_id: None,
                            });
                            current_node = Some(pending.len() - 1);
                        }
                        Err(reason) => issues.push(malformed(line_number, &reason)),
                    },
                    "ext_resource" => {
                        if let (Some(id), Some(path)) =
                            (header.attributes.get("id"), header.attributes.get("path"))
                        {
                            ext_resources.insert(id.clone(), path.clone());
                        }
                    }
                    _ => {}
                }
            }
            Ok(None) => {
                open_string = string_open_after(line, false);
                if let Some(slot) = current_node {
                    if let Some(id) = script_property(line) {
                        pending[slot].script_id = Some(id);
                    }
                }
            }
            Err(reason) => {
                current_node = None;
                issues.push(malformed(line_number, &reason));
            }
        }
    }

    let mut records = Vec::with_capacity(pending.len());
    for PendingRecord {
        mut record,
        script_id,
    } in pending
    {
        if let Some(id) = script_id {
            match ext_resources.get(&id) {
                Some(path) => record.script = Some(path.clone()),
                None => issues.push(ParseIssue {
                    kind: DiagnosticKind::ScriptResourceUnresolved,
                    line: record.line,
                    message: format!(
                        "Node \"{}\" attaches script resource \"{}\" but no ext_resource declares that id.",
                        record.name, id
                    ),
                }),
            }
        }
        records.push(record);
    }

    issues.sort_by_key(|issue| issue.line);
    ParsedScene { records, issues }
}

/// Whether a `"` string is still open at the end of `line`, given whether
/// one was open at its start. Backslash escapes are honored.
fn string_open_after(line: &str, open: bool) -> bool {
    let mut inside = open;
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if inside => {
                chars.next();
            }
            '"' => inside = !inside,
            _ => {}
        }
    }
    inside
}

fn malformed(line: usize, reason: &str) -> ParseIssue {
    ParseIssue {
        kind: DiagnosticKind::MalformedDeclaration,
        line,
        message: format!("Skipped malformed declaration: {}.", reason),
    }
}

fn node_record(header: &SectionHeader, line: usize) -> Result<NodeRecord, String> {
    let name = match header.attributes.get("name") {
        Some(name) if !name.is_empty() => name.clone(),
        _ => return Err("node declaration has no name".to_string()),
    };
    let parent = match header.attributes.get("parent").map(String::as_str) {
        None => ParentRef::Absent,
        Some(ROOT_SENTINEL) => ParentRef::Root,
        Some(parent) => ParentRef::Node(parent.to_string()),
    };

    Ok(NodeRecord {
        name,
        kind: header.attributes.get("type").cloned(),
        parent,
        script: None,
        line,
    })
}

fn script_property(line: &str) -> Option<String> {
    script_property_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

fn script_property_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"^script\s*=\s*ExtResource\(\s*"?([^"\s)]+)"?\s*\)"#)
            .expect("script property regex")
    })
}

/// Parses `[tag key=value ...]`. Returns `Ok(None)` for lines that are not
/// section headers and `Err` with a reason for headers that cannot be read.
pub fn parse_section_header(line: &str) -> Result<Option<SectionHeader>, String> {
    let trimmed = line.trim();
    let Some(body) = trimmed.strip_prefix('[') else {
        return Ok(None);
    };
    if !body.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
        return Ok(None);
    }

    let mut scanner = HeaderScanner::new(body);
    let tag = scanner.take_identifier();
    let mut attributes = BTreeMap::new();

    loop {
        scanner.skip_whitespace();
        match scanner.peek() {
            None => return Err(format!("unterminated [{}] header", tag)),
            Some(']') => break,
            Some(_) => {
                let key = scanner.take_identifier();
                if key.is_empty() {
                    return Err(format!("unexpected character in [{}] header", tag));
                }
                scanner.skip_whitespace();
                if scanner.bump() != Some('=') {
                    return Err(format!("attribute {} has no value", key));
                }
                scanner.skip_whitespace();
                let value = scanner
                    .take_value()
                    .map_err(|reason| format!("{} for attribute {}", reason, key))?;
                attributes.insert(key, value);
            }
        }
    }

    Ok(Some(SectionHeader { tag, attributes }))
}

struct HeaderScanner<'a> {
    source: &'a str,
    offset: usize,
}

impl<'a> HeaderScanner<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, offset: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    fn take_identifier(&mut self) -> String {
        let start = self.offset;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            self.bump();
        }
        self.source[start..self.offset].to_string()
    }

    fn take_value(&mut self) -> Result<String, String> {
        if self.peek() == Some('"') {
            self.bump();
            return self.take_quoted();
        }

        let start = self.offset;
        let mut depth = 0usize;
        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.bump();
                    self.take_quoted()?;
                    continue;
                }
                '(' | '[' | '{' => depth += 1,
                ')' | '}' if depth > 0 => depth -= 1,
                ']' if depth > 0 => depth -= 1,
                ']' => break,
                ch if ch.is_whitespace() && depth == 0 => break,
                _ => {}
            }
            self.bump();
        }

        if depth > 0 {
            return Err("unbalanced brackets".to_string());
        }
        if start == self.offset {
            return Err("empty value".to_string());
        }
        Ok(self.source[start..self.offset].to_string())
    }

    /// Reads up to the closing quote; the opening quote is already consumed.
    fn take_quoted(&mut self) -> Result<String, String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err("unterminated quoted value".to_string()),
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err("unterminated quoted value".to_string()),
                },
                Some(ch) => value.push(ch),
            }
        }
    }
}

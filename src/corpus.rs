use anyhow::{Context, Result};
use roxmltree::{Document, Node};
use std::path::Path;

/// Questions and gold answers read from a question/answer corpus
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    /// Question strings in the selected language, in document order
    pub questions: Vec<String>,
    /// Gold answer URIs, pooled over the whole corpus
    pub expected_answers: Vec<String>,
}

impl Corpus {
    /// Load a corpus file, keeping question strings tagged with `language`
    ///
    /// Gold answers are collected from every question unless
    /// `answers_follow_language` is set, in which case only questions that
    /// have a string in `language` contribute answers.
    pub fn from_file(path: &Path, language: &str, answers_follow_language: bool) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;

        Self::parse(&content, language, answers_follow_language)
            .with_context(|| format!("Failed to parse corpus file: {}", path.display()))
    }

    /// Parse corpus XML from a string
    pub fn parse(xml: &str, language: &str, answers_follow_language: bool) -> Result<Self> {
        let document = Document::parse(xml).context("Malformed corpus XML")?;
        let mut corpus = Corpus::default();

        for question in children(document.root_element(), "question") {
            let mut in_language = false;

            for string in children(question, "string") {
                if string.attribute("lang") == Some(language) {
                    corpus.questions.push(node_text(string));
                    in_language = true;
                }
            }

            if answers_follow_language && !in_language {
                continue;
            }

            for answers in children(question, "answers") {
                for answer in children(answers, "answer") {
                    for uri in children(answer, "uri") {
                        corpus.expected_answers.push(node_text(uri));
                    }
                }
            }
        }

        Ok(corpus)
    }
}

/// Child elements of `node` with the given tag name
fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |child| child.has_tag_name(name))
}

fn node_text(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().trim().to_string()
}

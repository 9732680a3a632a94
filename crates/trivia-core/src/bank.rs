// Question bank: categories of point-valued questions, built-in or loaded
// from a JSON document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BankError {
    #[error("not a question document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("category `{category}` is malformed: {source}")]
    Record {
        category: String,
        source: serde_json::Error,
    },

    #[error("question document has no categories")]
    NoCategories,

    #[error("category `{category}` has no questions")]
    EmptyCategory { category: String },

    #[error("category `{category}`, question {position}: value must be greater than 0")]
    NonPositiveValue { category: String, position: usize },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single question. `value` is both the displayed price and the score delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub value: u32,
    #[serde(rename = "question")]
    pub prompt: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub questions: Vec<QuestionRecord>,
}

/// Address of a board cell: category index in bank order, then position in
/// that category's question list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId {
    pub category: usize,
    pub position: usize,
}

impl CellId {
    pub const fn new(category: usize, position: usize) -> Self {
        CellId { category, position }
    }
}

/// Ordered mapping of category name to questions. Category order is the
/// display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    categories: Vec<Category>,
}

impl QuestionBank {
    /// Parse a custom question document.
    ///
    /// The document must be a JSON object whose keys are category names and
    /// whose values are arrays of `{ "value", "question", "answer" }`. Key
    /// order is preserved. Structural problems are rejected rather than
    /// surfacing later as holes in the board.
    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let doc: Map<String, Value> = serde_json::from_str(raw)?;

        let mut categories = Vec::with_capacity(doc.len());
        for (name, value) in doc {
            let questions: Vec<QuestionRecord> =
                serde_json::from_value(value).map_err(|source| BankError::Record {
                    category: name.clone(),
                    source,
                })?;
            categories.push(Category { name, questions });
        }

        Self::from_categories(categories)
    }

    /// Build a bank from already-typed categories, applying the same checks
    /// as [`QuestionBank::from_json`].
    pub fn from_categories(categories: Vec<Category>) -> Result<Self, BankError> {
        if categories.is_empty() {
            return Err(BankError::NoCategories);
        }
        for category in &categories {
            if category.questions.is_empty() {
                return Err(BankError::EmptyCategory {
                    category: category.name.clone(),
                });
            }
            if let Some(position) = category.questions.iter().position(|q| q.value == 0) {
                return Err(BankError::NonPositiveValue {
                    category: category.name.clone(),
                    position,
                });
            }
        }
        Ok(QuestionBank { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of questions across all categories.
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    /// Look up the question at a cell.
    pub fn get(&self, cell: CellId) -> Option<&QuestionRecord> {
        self.categories
            .get(cell.category)
            .and_then(|c| c.questions.get(cell.position))
    }

    /// Resolve a (category name, position) pair to a cell address.
    pub fn cell(&self, category: &str, position: usize) -> Option<CellId> {
        let idx = self.categories.iter().position(|c| c.name == category)?;
        (position < self.categories[idx].questions.len()).then_some(CellId::new(idx, position))
    }
}

impl Default for QuestionBank {
    /// The built-in web development board: 5 categories of 5 questions.
    fn default() -> Self {
        let categories = DEFAULT_QUESTIONS
            .iter()
            .map(|(name, questions)| Category {
                name: (*name).to_string(),
                questions: questions
                    .iter()
                    .map(|(value, prompt, answer)| QuestionRecord {
                        value: *value,
                        prompt: (*prompt).to_string(),
                        answer: (*answer).to_string(),
                    })
                    .collect(),
            })
            .collect();
        QuestionBank { categories }
    }
}

// ---------------------------------------------------------------------------
// Built-in board
// ---------------------------------------------------------------------------

type BuiltinCategory = (&'static str, &'static [(u32, &'static str, &'static str)]);

const DEFAULT_QUESTIONS: &[BuiltinCategory] = &[
    (
        "HTML Structure",
        &[
            (
                100,
                "You need to create a navigation menu. What semantic HTML tag should you use?",
                "<nav> - it tells browsers and screen readers this is navigation",
            ),
            (
                200,
                "Your image isn't showing up. What are 2 things to check in your <img> tag?",
                "Check the src attribute has the correct file path, and make sure the file extension matches (.jpg, .png, etc.)",
            ),
            (
                300,
                "Fix this code: <div class='button'Click Me<div>",
                "<div class='button'>Click Me</div> - need closing > on opening tag and proper closing tag with /",
            ),
            (
                400,
                "You want a clickable button that submits a form. Should you use <button> or <div>?",
                "<button> - it's semantic, accessible, and works with keyboards. Don't use <div> for buttons!",
            ),
            (
                500,
                "Your website needs a main content area, sidebar, and footer. What HTML5 semantic tags should you use?",
                "<main> for main content, <aside> for sidebar, <footer> for footer - these help with accessibility and SEO",
            ),
        ],
    ),
    (
        "CSS Layouts",
        &[
            (
                100,
                "How do you add space BETWEEN flex items?",
                "Use gap: 20px; on the flex container (super easy!)",
            ),
            (
                200,
                "Your navbar items are stacking vertically. How do you make them horizontal with flexbox?",
                "Add display: flex; to the parent container - flex-direction defaults to row (horizontal)",
            ),
            (
                300,
                "Center a div both horizontally AND vertically on the page using flexbox.",
                "On parent: display: flex; justify-content: center; align-items: center; min-height: 100vh;",
            ),
            (
                400,
                "You have 3 columns that should be equal width. Write the flexbox code.",
                "Parent: display: flex; Children: flex: 1; (each child will take equal space)",
            ),
            (
                500,
                "Your flex items are squishing when the screen gets smaller. How do you prevent this?",
                "Add flex-wrap: wrap; to the parent, or set flex-shrink: 0; on items you don't want to shrink",
            ),
        ],
    ),
    (
        "CSS Styling Tips",
        &[
            (
                100,
                "How do you make rounded corners on a button?",
                "border-radius: 10px; (higher number = more rounded)",
            ),
            (
                200,
                "Add a shadow to make your card look like it's floating above the page.",
                "box-shadow: 0 4px 8px rgba(0,0,0,0.2); (x, y, blur, color)",
            ),
            (
                300,
                "Your white text on a yellow background is hard to read. What should you do?",
                "Change to a darker color for better contrast - aim for at least 4.5:1 contrast ratio for accessibility",
            ),
            (
                400,
                "Make a smooth color transition when hovering over a button (write the CSS).",
                "button { transition: background 0.3s; } button:hover { background: blue; }",
            ),
            (
                500,
                "Create a 2-color gradient background from purple to blue.",
                "background: linear-gradient(to right, purple, blue); or use degrees like: linear-gradient(135deg, purple, blue);",
            ),
        ],
    ),
    (
        "UI/UX Best Practices",
        &[
            (
                100,
                "Your website text is 10px and hard to read. What's a better minimum size?",
                "16px (1rem) - this is the standard body text size for good readability",
            ),
            (
                200,
                "Should you use 10 different fonts on your website?",
                "No! Use 2-3 max. One for headings, one for body text keeps it clean and professional",
            ),
            (
                300,
                "A user clicks a button but nothing happens. What feedback should you add?",
                "Add hover effects (color change, cursor: pointer), active states, and maybe a loading indicator",
            ),
            (
                400,
                "Your page has bright red background, neon green text, and 5 flashing animations. What's wrong?",
                "Way too much! Use a simple color scheme (2-3 colors), readable text, and minimal animations. Less is more!",
            ),
            (
                500,
                "How do you make sure your website works for people using keyboards (no mouse)?",
                "Use semantic HTML (<button> not <div>), ensure tab order makes sense, add focus states, and test with Tab key",
            ),
        ],
    ),
    (
        "JavaScript Basics",
        &[
            (
                100,
                "Write code to select an element with id='myButton'",
                "document.getElementById('myButton') or document.querySelector('#myButton')",
            ),
            (
                200,
                "Add a click event to a button that shows an alert saying 'Hello!'",
                "button.addEventListener('click', function() { alert('Hello!'); });",
            ),
            (
                300,
                "Change the text content of a <h1> to 'Welcome!' using JavaScript.",
                "document.querySelector('h1').textContent = 'Welcome!';",
            ),
            (
                400,
                "Toggle a class 'active' on and off when clicking a button.",
                "button.addEventListener('click', function() { element.classList.toggle('active'); });",
            ),
            (
                500,
                "Your click event isn't working. What's one common mistake to check?",
                "Make sure your script runs AFTER the HTML loads - put <script> at bottom of <body> or use DOMContentLoaded event",
            ),
        ],
    ),];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

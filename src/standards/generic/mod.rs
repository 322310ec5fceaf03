//! The `Generic` standard: checks that apply to every language.

mod disallow_tab_indent;
mod todo;

pub use disallow_tab_indent::DisallowTabIndent;
pub use todo::Todo;

use crate::sniff::SniffDefinition;

pub fn sniffs() -> Vec<SniffDefinition> {
    vec![
        SniffDefinition::from_sniff(DisallowTabIndent::CODE, DisallowTabIndent),
        SniffDefinition::from_sniff(Todo::CODE, Todo),
    ]
}

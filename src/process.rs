//! The rewrite passes that turn a Jupyter Book chapter into HTMLBook.
//!
//! Each pass takes the chapter's tree and rewrites it in place. They are public so they can be
//! run on their own, but they expect to see the tree the way the earlier passes of [`run`]
//! leave it.

use indexmap::IndexSet;

use crate::{chapter::Chapter, tree::Division, Config};

pub mod admonition;
pub mod bibliography;
pub mod clean;
pub mod code;
pub mod figure;
pub mod footnote;
pub mod glossary;
pub mod ids;
pub mod math;
pub mod section;
pub mod sidebar;
pub mod xref;

pub use ids::BookIds;

/// Runs every pass over `chapter`, returning the ids it ends up with.
pub fn run(chapter: &mut Chapter, cfg: &Config, book_ids: &BookIds) -> IndexSet<String> {
    let tree = &mut chapter.tree;

    clean::clean(tree, cfg.keep_section_numbers);
    figure::figures(tree);
    figure::informal_figures(tree);
    xref::internal_refs(tree);
    bibliography::citation_lists(tree);
    footnote::footnotes(tree);
    admonition::admonitions(tree);
    math::math(tree);

    // Example comments have to be read before numbering shifts the code
    code::examples(tree);
    if cfg.code.keep_highlighting {
        code::keep_highlighting(tree);
    } else {
        code::code_blocks(tree, !cfg.code.skip_numbering);
    }
    code::inline_code(tree);

    section::move_span_ids_to_sections(tree);
    sidebar::sidebars(tree);
    section::subsections(tree);
    xref::remaining_refs(tree);
    if chapter.division == Division::Glossary {
        glossary::glossary(tree);
    }

    ids::process_ids(tree, book_ids)
}

//! Catalog hierarchy display.
//!
//! Walks catalogs and collections depth-first; items are not listed.

use crate::domain::CatalogNode;

/// Visit `node` and every catalog below it with its depth (root is 0)
pub fn walk_catalogs<F>(node: &CatalogNode, visit: &mut F)
where
    F: FnMut(&CatalogNode, usize),
{
    walk(node, 0, visit);
}

fn walk<F>(node: &CatalogNode, depth: usize, visit: &mut F)
where
    F: FnMut(&CatalogNode, usize),
{
    visit(node, depth);
    for child in node.catalogs() {
        walk(child, depth + 1, visit);
    }
}

/// Render the hierarchy as one identifier per line, two spaces per level
pub fn render_tree(root: &CatalogNode) -> String {
    let mut out = String::new();
    walk_catalogs(root, &mut |node: &CatalogNode, depth: usize| {
        out.push_str(&format!("{}{}\n", "  ".repeat(depth), node.id));
    });
    out
}

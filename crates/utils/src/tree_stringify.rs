#[derive(Debug, Default)]
struct TreeNode {
    key: String,
    children: Vec<TreeNode>,
    content: String,
}

impl TreeNode {
    fn child_mut(&mut self, key: &str) -> &mut TreeNode {
        let position = match self.children.iter().position(|c| c.key == key) {
            Some(i) => i,
            None => {
                self.children.push(TreeNode {
                    key: key.to_string(),
                    ..Default::default()
                });
                self.children.len() - 1
            }
        };
        &mut self.children[position]
    }
}

/// Renders `(path, content)` pairs as an indented tree, one entry per line.
///
/// Paths are split on `pat`, entries are sorted by path. Intermediate
/// directories that carry no content and have a single child are folded into
/// their child (`a/b/c`).
pub fn tree_stringify<
    'a,
    Entities: Iterator<Item = (&'a str, Content)>,
    Content: std::fmt::Display,
>(
    entities: Entities,
    pat: &str,
) -> String {
    let mut tree = TreeNode::default();

    let mut entities = entities.collect::<Vec<_>>();
    entities.sort_by_key(|v| v.0);

    for (path, content) in entities {
        let mut current = &mut tree;
        for part in path.split(pat).filter(|part| !part.is_empty()) {
            current = current.child_mut(part);
        }
        current.content = content.to_string();
    }

    fn output_tree_children(out: &mut String, tree: TreeNode, prefix: &str, pat: &str) {
        let count = tree.children.len();
        for (i, mut entry) in tree.children.into_iter().enumerate() {
            let mut key = entry.key.clone();
            while entry.children.len() == 1 && entry.content.is_empty() {
                entry = entry.children.remove(0);
                key = format!("{}{}{}", key, pat, entry.key);
            }

            let output_content = if entry.content.is_empty() {
                Default::default()
            } else {
                format!(" [{}]", entry.content)
            };

            let last = count == i + 1;
            out.push_str(&format!(
                "{}{} {}{}\n",
                prefix,
                if last { "└" } else { "├" },
                key,
                output_content
            ));

            if !entry.children.is_empty() {
                let new_prefix = format!("{}{}", prefix, if last { "  " } else { "│ " });
                output_tree_children(out, entry, &new_prefix, pat);
            }
        }
    }

    let mut out = String::new();
    output_tree_children(&mut out, tree, "", pat);
    out
}

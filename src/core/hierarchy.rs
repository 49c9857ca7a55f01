//! Read-only parent/child indexes over the location (city → town) and
//! category (category → subcategory) collections.
//!
//! Lookups never fail: an id that is not in the index degrades to its raw
//! value when a label is requested, so a stale bookmark still renders.

use std::collections::HashMap;

use super::{Category, City, SubCategory, Town};

/// A record that can live in a [`Hierarchy`].
pub trait HierarchyNode {
    fn id(&self) -> &str;
    fn title(&self) -> &str;

    /// The id of the owning parent record. Top-level records have none.
    fn parent_id(&self) -> Option<&str> {
        None
    }
}

impl HierarchyNode for City {
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl HierarchyNode for Town {
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn parent_id(&self) -> Option<&str> {
        Some(&self.city_id)
    }
}

impl HierarchyNode for Category {
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl HierarchyNode for SubCategory {
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn parent_id(&self) -> Option<&str> {
        Some(&self.category_id)
    }
}

/// One entry of a picker search: a parent and the children that matched.
#[derive(Debug)]
pub struct PickerGroup<'a, P, C> {
    pub parent: &'a P,
    pub children: Vec<&'a C>,
}

/// An index over a one-to-many parent/child collection pair.
#[derive(Debug, Clone)]
pub struct Hierarchy<P, C> {
    parents: Vec<P>,
    children: Vec<C>,
    parent_index: HashMap<String, usize>,
    child_index: HashMap<String, usize>,
    children_by_parent: HashMap<String, Vec<usize>>,
}

pub type LocationHierarchy = Hierarchy<City, Town>;
pub type CategoryHierarchy = Hierarchy<Category, SubCategory>;

impl<P, C> Default for Hierarchy<P, C> {
    fn default() -> Self {
        Self {
            parents: Vec::new(),
            children: Vec::new(),
            parent_index: HashMap::new(),
            child_index: HashMap::new(),
            children_by_parent: HashMap::new(),
        }
    }
}

impl<P: HierarchyNode, C: HierarchyNode> Hierarchy<P, C> {
    /// Builds the index. With duplicate ids the first record wins.
    pub fn new(parents: Vec<P>, children: Vec<C>) -> Self {
        let mut parent_index = HashMap::with_capacity(parents.len());
        for (i, parent) in parents.iter().enumerate() {
            parent_index.entry(parent.id().to_string()).or_insert(i);
        }

        let mut child_index = HashMap::with_capacity(children.len());
        let mut children_by_parent: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, child) in children.iter().enumerate() {
            child_index.entry(child.id().to_string()).or_insert(i);
            if let Some(parent_id) = child.parent_id() {
                children_by_parent
                    .entry(parent_id.to_string())
                    .or_default()
                    .push(i);
            }
        }

        Self {
            parents,
            children,
            parent_index,
            child_index,
            children_by_parent,
        }
    }

    pub fn parents(&self) -> &[P] {
        &self.parents
    }

    pub fn children(&self) -> &[C] {
        &self.children
    }

    pub fn find_parent(&self, id: &str) -> Option<&P> {
        self.parent_index.get(id).map(|&i| &self.parents[i])
    }

    pub fn find_child(&self, id: &str) -> Option<&C> {
        self.child_index.get(id).map(|&i| &self.children[i])
    }

    /// Children of `parent_id` in the order they were received.
    pub fn children_of(&self, parent_id: &str) -> Vec<&C> {
        self.children_by_parent
            .get(parent_id)
            .map(|indices| indices.iter().map(|&i| &self.children[i]).collect())
            .unwrap_or_default()
    }

    /// The parent record that owns `child_id`, if both are known.
    pub fn parent_of(&self, child_id: &str) -> Option<&P> {
        self.find_child(child_id)
            .and_then(|child| child.parent_id())
            .and_then(|parent_id| self.find_parent(parent_id))
    }

    /// `true` only when `child_id` is a known child whose parent is `parent_id`.
    pub fn child_belongs_to(&self, child_id: &str, parent_id: &str) -> bool {
        self.find_child(child_id)
            .and_then(|child| child.parent_id())
            .is_some_and(|owner| owner == parent_id)
    }

    /// Title of a parent record, or the raw id when it is unknown.
    pub fn parent_label(&self, id: &str) -> String {
        match self.find_parent(id) {
            Some(parent) => parent.title().to_string(),
            None => {
                tracing::debug!("No parent record for id {:?}, showing raw id", id);
                id.to_string()
            }
        }
    }

    /// Title of a child record, or the raw id when it is unknown.
    pub fn child_label(&self, id: &str) -> String {
        match self.find_child(id) {
            Some(child) => child.title().to_string(),
            None => {
                tracing::debug!("No child record for id {:?}, showing raw id", id);
                id.to_string()
            }
        }
    }

    /// Picker label such as `"Harare > Avondale"`.
    ///
    /// A known child is shown with its own parent. Otherwise the parent title is
    /// used on its own, and `None` is returned when neither resolves.
    pub fn path_label(&self, parent_id: Option<&str>, child_id: Option<&str>) -> Option<String> {
        if let Some(child) = child_id.and_then(|id| self.find_child(id)) {
            if let Some(parent) = child.parent_id().and_then(|id| self.find_parent(id)) {
                return Some(format!("{} > {}", parent.title(), child.title()));
            }
        }
        parent_id
            .and_then(|id| self.find_parent(id))
            .map(|parent| parent.title().to_string())
    }

    /// Location line for a listing card, e.g. `"Avondale, Harare"`.
    ///
    /// When the child does not belong to the parent the record is inconsistent
    /// and only the parent is shown.
    pub fn place_label(&self, parent_id: Option<&str>, child_id: Option<&str>) -> Option<String> {
        let parent_id = parent_id?;
        let parent = self.parent_label(parent_id);
        match child_id {
            Some(child_id) if self.child_belongs_to(child_id, parent_id) => {
                Some(format!("{}, {}", self.child_label(child_id), parent))
            }
            Some(child_id) => {
                tracing::debug!(
                    "Child {:?} does not belong to parent {:?}, falling back to parent label",
                    child_id,
                    parent_id
                );
                Some(parent)
            }
            None => Some(parent),
        }
    }

    /// Case-insensitive picker search.
    ///
    /// A parent is listed when its title matches or any of its children match;
    /// when the parent matches, all of its children are listed.
    pub fn search(&self, term: &str) -> Vec<PickerGroup<'_, P, C>> {
        let term = term.to_lowercase();
        self.parents
            .iter()
            .filter_map(|parent| {
                let parent_matches = parent.title().to_lowercase().contains(&term);
                let children: Vec<&C> = self
                    .children_of(parent.id())
                    .into_iter()
                    .filter(|child| parent_matches || child.title().to_lowercase().contains(&term))
                    .collect();
                (parent_matches || !children.is_empty()).then_some(PickerGroup { parent, children })
            })
            .collect()
    }

    /// Children whose title contains `term`, ignoring case.
    pub fn search_children(&self, term: &str) -> Vec<&C> {
        let term = term.to_lowercase();
        self.children
            .iter()
            .filter(|child| child.title().to_lowercase().contains(&term))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: &str, title: &str) -> City {
        City {
            id: id.to_string(),
            title: title.to_string(),
            slug: None,
        }
    }

    fn town(id: &str, title: &str, city_id: &str) -> Town {
        Town {
            id: id.to_string(),
            title: title.to_string(),
            slug: None,
            city_id: city_id.to_string(),
        }
    }

    fn locations() -> LocationHierarchy {
        Hierarchy::new(
            vec![city("harare", "Harare"), city("bulawayo", "Bulawayo"), city("mutare", "Mutare")],
            vec![
                town("avondale", "Avondale", "harare"),
                town("borrowdale", "Borrowdale", "harare"),
                town("suburbs", "Suburbs", "bulawayo"),
            ],
        )
    }

    #[test]
    fn test_children_of_keeps_source_order() {
        let index = locations();
        let towns: Vec<_> = index.children_of("harare").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(towns, vec!["avondale", "borrowdale"]);
        assert!(index.children_of("mutare").is_empty());
        assert!(index.children_of("nowhere").is_empty());
    }

    #[test]
    fn test_labels_fall_back_to_raw_id() {
        let index = locations();
        assert_eq!(index.parent_label("harare"), "Harare");
        assert_eq!(index.child_label("avondale"), "Avondale");
        assert_eq!(index.parent_label("gweru"), "gweru");
        assert_eq!(index.child_label("ghost-town"), "ghost-town");
    }

    #[test]
    fn test_child_belongs_to() {
        let index = locations();
        assert!(index.child_belongs_to("avondale", "harare"));
        assert!(!index.child_belongs_to("avondale", "bulawayo"));
        assert!(!index.child_belongs_to("ghost-town", "harare"));
        assert_eq!(index.parent_of("suburbs").map(|c| c.id.as_str()), Some("bulawayo"));
    }

    #[test]
    fn test_path_label() {
        let index = locations();
        assert_eq!(
            index.path_label(None, Some("avondale")).as_deref(),
            Some("Harare > Avondale")
        );
        assert_eq!(index.path_label(Some("mutare"), None).as_deref(), Some("Mutare"));
        assert_eq!(
            index.path_label(Some("mutare"), Some("ghost-town")).as_deref(),
            Some("Mutare")
        );
        assert_eq!(index.path_label(None, Some("ghost-town")), None);
    }

    #[test]
    fn test_place_label_falls_back_to_city_for_inconsistent_records() {
        let index = locations();
        assert_eq!(
            index.place_label(Some("harare"), Some("borrowdale")).as_deref(),
            Some("Borrowdale, Harare")
        );
        assert_eq!(
            index.place_label(Some("bulawayo"), Some("borrowdale")).as_deref(),
            Some("Bulawayo")
        );
        assert_eq!(index.place_label(None, Some("borrowdale")), None);
    }

    #[test]
    fn test_search_matches_parent_or_child_titles() {
        let index = locations();

        let groups = index.search("borrow");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].parent.id, "harare");
        assert_eq!(groups[0].children.len(), 1);

        let groups = index.search("HARARE");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].children.len(), 2);

        let groups = index.search("");
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_search_children() {
        let index = locations();
        let found: Vec<_> = index.search_children("dale").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(found, vec!["avondale", "borrowdale"]);
        assert!(index.search_children("xyz").is_empty());
    }
}

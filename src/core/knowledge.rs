//! Knowledge stacks: user-named buckets of reference files the backend may
//! use as retrieval context. The client only manages names, activation, and
//! pending file selections; stack ids are opaque to the server.

use std::path::PathBuf;

/// The reserved stack every session starts with. It cannot be deleted.
pub const DEFAULT_STACK_ID: &str = "default";

#[derive(Debug, Clone)]
pub struct KnowledgeStack {
    pub id: String,
    pub name: String,
    pub files: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct StackRegistry {
    stacks: Vec<KnowledgeStack>,
    active: Vec<String>,
    next_id: u64,
}

impl Default for StackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StackRegistry {
    pub fn new() -> Self {
        StackRegistry {
            stacks: vec![KnowledgeStack {
                id: DEFAULT_STACK_ID.to_string(),
                name: "Default Knowledge".to_string(),
                files: Vec::new(),
            }],
            active: vec![DEFAULT_STACK_ID.to_string()],
            next_id: 1,
        }
    }

    pub fn stacks(&self) -> &[KnowledgeStack] {
        &self.stacks
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeStack> {
        self.stacks.iter().find(|s| s.id == id)
    }

    /// Ids of active stacks, in activation order. Cloned into each request.
    pub fn active_ids(&self) -> Vec<String> {
        self.active.clone()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|a| a == id)
    }

    /// Create a stack with a fresh id and auto-activate it. Blank names are
    /// rejected.
    pub fn create(&mut self, name: &str) -> Option<&KnowledgeStack> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let id = format!("stack-{}", self.next_id);
        self.next_id += 1;
        self.stacks.push(KnowledgeStack {
            id: id.clone(),
            name: name.to_string(),
            files: Vec::new(),
        });
        self.active.push(id);
        self.stacks.last()
    }

    /// Delete a stack and deactivate it. The default stack and unknown ids
    /// are refused.
    pub fn delete(&mut self, id: &str) -> bool {
        if id == DEFAULT_STACK_ID || self.get(id).is_none() {
            return false;
        }

        self.stacks.retain(|s| s.id != id);
        self.active.retain(|a| a != id);
        true
    }

    /// Toggle active membership. Returns the new state, or `None` for
    /// unknown ids.
    pub fn toggle_active(&mut self, id: &str) -> Option<bool> {
        self.get(id)?;

        if self.is_active(id) {
            self.active.retain(|a| a != id);
            Some(false)
        } else {
            self.active.push(id.to_string());
            Some(true)
        }
    }

    /// Replace the file selection for a stack. There is no merge: a new
    /// selection supersedes the previous one.
    pub fn attach_files(&mut self, id: &str, files: Vec<PathBuf>) -> bool {
        match self.stacks.iter_mut().find(|s| s.id == id) {
            Some(stack) => {
                stack.files = files;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_active_default_stack() {
        let registry = StackRegistry::new();
        assert_eq!(registry.stacks().len(), 1);
        assert!(registry.is_active(DEFAULT_STACK_ID));
    }

    #[test]
    fn create_rejects_blank_names() {
        let mut registry = StackRegistry::new();
        assert!(registry.create("").is_none());
        assert!(registry.create("   ").is_none());
        assert_eq!(registry.stacks().len(), 1);
    }

    #[test]
    fn create_assigns_fresh_ids_and_activates() {
        let mut registry = StackRegistry::new();
        let first = registry.create("Papers").expect("created").id.clone();
        let second = registry.create("Notes").expect("created").id.clone();
        assert_ne!(first, second);
        assert!(registry.is_active(&first));
        assert!(registry.is_active(&second));
        assert_eq!(registry.get(&second).expect("stack").name, "Notes");
    }

    #[test]
    fn default_stack_cannot_be_deleted() {
        let mut registry = StackRegistry::new();
        assert!(!registry.delete(DEFAULT_STACK_ID));
        assert_eq!(registry.stacks().len(), 1);
        assert!(registry.is_active(DEFAULT_STACK_ID));
    }

    #[test]
    fn delete_removes_from_registry_and_active_set() {
        let mut registry = StackRegistry::new();
        let id = registry.create("Papers").expect("created").id.clone();
        assert!(registry.delete(&id));
        assert!(registry.get(&id).is_none());
        assert!(!registry.is_active(&id));
        assert!(!registry.delete("no-such-stack"));
    }

    #[test]
    fn toggling_flips_membership() {
        let mut registry = StackRegistry::new();
        assert_eq!(registry.toggle_active(DEFAULT_STACK_ID), Some(false));
        assert!(!registry.is_active(DEFAULT_STACK_ID));
        assert_eq!(registry.toggle_active(DEFAULT_STACK_ID), Some(true));
        assert_eq!(registry.toggle_active("no-such-stack"), None);
    }

    #[test]
    fn attach_replaces_prior_selection() {
        let mut registry = StackRegistry::new();
        assert!(registry.attach_files(
            DEFAULT_STACK_ID,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]
        ));
        assert!(registry.attach_files(DEFAULT_STACK_ID, vec![PathBuf::from("c.txt")]));
        let files = &registry.get(DEFAULT_STACK_ID).expect("stack").files;
        assert_eq!(files, &[PathBuf::from("c.txt")]);
        assert!(!registry.attach_files("no-such-stack", Vec::new()));
    }
}

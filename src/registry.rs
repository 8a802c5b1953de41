//! Static list of the tools the shell can launch.

use std::fmt;

/// Every tool in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Renamer,
    FolderCreator,
}

impl Tool {
    pub const ALL: [Self; 2] = [Self::Renamer, Self::FolderCreator];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Renamer => "renamer",
            Self::FolderCreator => "folder_creator",
        }
    }

    #[must_use]
    pub const fn info(self) -> ToolInfo {
        match self {
            Self::Renamer => ToolInfo {
                tool: self,
                id: self.id(),
                name: "File Renamer",
                description: "Batch rename files with sequential numbers or their original names",
            },
            Self::FolderCreator => ToolInfo {
                tool: self,
                id: self.id(),
                name: "Folder Creator",
                description: "Create numbered folders following a naming rule",
            },
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Display information for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolInfo {
    pub tool: Tool,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Registered tools in display order.
#[derive(Debug, Clone)]
pub struct Registry {
    tools: Vec<ToolInfo>,
}

impl Registry {
    /// Registry with all tools built into this crate.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            tools: Tool::ALL.iter().map(|tool| tool.info()).collect(),
        }
    }

    /// Look up a tool by its id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ToolInfo> {
        self.tools.iter().find(|info| info.id == id)
    }

    #[must_use]
    pub fn tools(&self) -> &[ToolInfo] {
        &self.tools
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_all_tools_in_order() {
        let registry = Registry::builtin();
        let ids: Vec<&str> = registry.tools().iter().map(|info| info.id).collect();
        assert_eq!(ids, ["renamer", "folder_creator"]);
        assert!(!registry.is_empty());
    }

    #[test]
    fn get_by_id() {
        let registry = Registry::builtin();
        let info = registry.get("folder_creator").unwrap();
        assert_eq!(info.tool, Tool::FolderCreator);
        assert_eq!(info.name, "Folder Creator");
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(Registry::builtin().get("thumbnail").is_none());
        assert!(Registry::builtin().get("").is_none());
    }

    #[test]
    fn ids_are_unique() {
        let registry = Registry::builtin();
        for info in registry.tools() {
            assert_eq!(registry.get(info.id).map(|found| found.tool), Some(info.tool));
        }
    }
}

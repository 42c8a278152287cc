#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum EntryType {
    File,
    Directory,
}

/// A node stored by [`MapFS`](crate::MapFS): a directory, or a file with its bytes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entry {
    entry_type: EntryType,
    content: Vec<u8>,
}

impl Entry {
    pub fn new(entry_type: EntryType) -> Entry {
        Entry {
            entry_type,
            content: Vec::new(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    /// File content; always empty for directories.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Number of content bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub(crate) fn truncate(&mut self) {
        self.content.clear();
    }

    pub(crate) fn append_content(&mut self, content: &[u8]) {
        self.content.extend_from_slice(content);
    }
}

/// A stored person. `id` is `None` until the first save assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub notes: Vec<Note>,
}

/// A stored note. `person_id` points back to the owning person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub id: Option<String>,
    pub content: Option<String>,
    pub person_id: Option<String>,
}

mod note;
mod person;

pub use note::NoteService;
pub use person::PersonService;

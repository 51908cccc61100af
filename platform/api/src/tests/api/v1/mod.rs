mod blog;
mod events;
mod gallery;
mod settings;

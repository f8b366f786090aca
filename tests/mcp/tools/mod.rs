mod keys;
mod push;
mod settings;

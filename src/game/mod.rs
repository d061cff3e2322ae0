// Game logic: everything that decides how the character behaves

pub mod characters;

pub mod audit;
pub mod courses;
pub mod materials;
pub mod modules;
pub mod quizzes;
pub mod subjects;
pub mod users;

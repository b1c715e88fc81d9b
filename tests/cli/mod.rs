mod errors;
mod history;
mod init;
mod leaderboard;
mod rubric;
mod scoring;

mod helpers;

mod auth_test;
mod messaging_test;
mod moderation_test;

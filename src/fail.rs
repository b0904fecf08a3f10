use crate::handler::PublishError;

#[cold]
#[inline(never)]
pub fn publish_failed(logger: &str, error: &PublishError) {
    eprintln!("Publishing to logger `{}` failed: {}", logger, error);
}

#[cold]
#[inline(never)]
pub fn parent_publish_failed(logger: &str, error: &PublishError) {
    eprintln!(
        "Publishing to the parent output of logger `{}` failed: {}",
        logger, error
    );
}

mod feed_test;
mod support;

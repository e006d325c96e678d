//! End-to-end tests against a mocked SimpleLogin API.

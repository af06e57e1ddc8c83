mod google_api_tests;
mod routes_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - google_calendar_mock: Mocking the calendar capability for testing
// - routes_tests: Driving the HTTP surface against a stubbed provider
// - google_api_tests: Wire-level client tests against a mock HTTP server

mod agent_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - google_calendar_mock: In-memory calendar that records every call
// - dispatch_tests: Intent dispatching against the mock calendar
// - agent_tests: The full command pipeline with a scripted completion provider
// - smoke_tests: Wiring of the real clients without live services

mod realtime_tests;

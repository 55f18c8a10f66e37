mod backend_tests;

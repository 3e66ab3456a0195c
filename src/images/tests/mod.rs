mod collect_tests;

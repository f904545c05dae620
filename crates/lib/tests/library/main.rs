mod bundle_tests;

mod support;

mod ranking_tests;

mod bootstrap_test;

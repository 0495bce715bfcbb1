mod test_connect_rules;

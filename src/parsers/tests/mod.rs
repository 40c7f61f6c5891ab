mod image_url_tests;
